//! Graph subcommand handlers: translate, normalize, discover

use super::{read_data_arg, save_payload, AppContext};
use crate::cli::{
    DiscoverArgs, GraphAction, GraphArgs, NormalizeArgs, OutputFormat, TranslateArgs,
};
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use graphbridge_core::{translate, EtlContext, EtlResult};
use graphbridge_schemas::{GraphSchema, JsonSchemaValidator, SchemaValidator, ValidationErrors};
use serde_json::Value;
use tracing::{info, instrument};

/// Dispatch a graph subcommand
pub async fn handle_graph(
    args: GraphArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        GraphAction::Translate(args) => translate_payload(args, ctx, output).await,
        GraphAction::Normalize(args) => normalize_payload(args, ctx, output).await,
        GraphAction::Discover(args) => discover_models(args, ctx, output),
    }
}

#[instrument(skip(args, ctx, output), fields(source = %args.source, target = %args.target))]
async fn translate_payload(
    args: TranslateArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details(
        "graph_translate",
        &format!("{} -> {}", args.source, args.target),
    );

    let data = read_data_arg(&args.input)?;
    let result = run_translation(ctx, &args.source, &args.target, data, output).await?;

    match &args.save_to {
        Some(path) => save_payload(output, path, &result.data),
        None => output.etl_result(&result),
    }
}

#[instrument(skip(args, ctx, output), fields(source = %args.source, model = %args.model))]
async fn normalize_payload(
    args: NormalizeArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details(
        "graph_normalize",
        &format!("{} -> {}", args.source, args.model),
    );

    let data = read_data_arg(&args.input)?;
    let result = run_translation(ctx, &args.source, &args.model, data, output).await?;

    if args.validate {
        validate_normalized(ctx, &args.model, args.entity.as_deref(), &result.data, output)?;
        output.success(&format!(
            "✓ Normalized records conform to model '{}'",
            args.model
        ))?;
    }

    match &args.save_to {
        Some(path) => save_payload(output, path, &result.data),
        None => output.etl_result(&result),
    }
}

/// Translate `data` through the registered bridge for a route
///
/// A total failure prints the per-record errors before propagating, so
/// the operator sees what went wrong record by record.
async fn run_translation(
    ctx: &AppContext,
    source: &str,
    target: &str,
    data: Value,
    output: &mut OutputWriter,
) -> Result<EtlResult> {
    let context = EtlContext::new(source, target, data);

    match translate(&ctx.bridges, &ctx.transforms, context).await {
        Ok(result) => {
            let stats = result.metadata.stats;
            info!(
                "Translated {} record(s): {} succeeded, {} failed",
                stats.processed, stats.succeeded, stats.failed
            );
            if stats.failed > 0 {
                output.warning(&format!(
                    "⚠ {} record(s) dropped during translation",
                    stats.failed
                ))?;
            }
            Ok(result)
        }
        Err(graphbridge_core::Error::TranslationFailed {
            bridge_id,
            processed,
            errors,
        }) => {
            output.error(&format!(
                "✗ All {} record(s) failed through bridge '{}'",
                processed, bridge_id
            ))?;
            for record_error in &errors {
                output.error(&format!("  • {}", record_error))?;
            }
            Err(Error::Engine(graphbridge_core::Error::TranslationFailed {
                bridge_id,
                processed,
                errors,
            }))
        }
        Err(e) => Err(e.into()),
    }
}

/// Validate normalized records against the target model's entity schema
fn validate_normalized(
    ctx: &AppContext,
    model_name: &str,
    entity: Option<&str>,
    data: &Value,
    output: &mut OutputWriter,
) -> Result<()> {
    let model = ctx.models.get_model(model_name)?;

    let entity = match entity {
        Some(name) => name.to_string(),
        None => single_entity(&model.schema).ok_or_else(|| {
            Error::invalid_args(format!(
                "model '{}' declares entities [{}]; pass --entity to pick one",
                model_name,
                model
                    .schema
                    .entities
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?,
    };

    let validator = JsonSchemaValidator::new();
    let mut failures = ValidationErrors::new();

    let records: Vec<&Value> = match data {
        Value::Array(records) => records.iter().collect(),
        record => vec![record],
    };

    info!(
        "Validating {} record(s) as entity '{}' of model '{}'",
        records.len(),
        entity,
        model_name
    );
    for record in records {
        if let Err(e) = validator.validate(&model.schema, &entity, record) {
            failures.add(e);
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        output.validation_errors(&failures)?;
        Err(Error::Validation(failures))
    }
}

/// The schema's only entity name, `None` when it declares zero or several
fn single_entity(schema: &GraphSchema) -> Option<String> {
    let mut entities = schema.entities.keys();
    match (entities.next(), entities.next()) {
        (Some(name), None) => Some(name.clone()),
        _ => None,
    }
}

#[instrument(skip(args, ctx, output))]
fn discover_models(args: DiscoverArgs, ctx: &AppContext, output: &mut OutputWriter) -> Result<()> {
    let (title, names) = match &args.model {
        Some(name) => (
            format!("Models bridged with '{}'", name),
            ctx.bridges.connected_models(name),
        ),
        None => (
            "Models known to the bridge graph".to_string(),
            ctx.bridges.known_models(),
        ),
    };

    info!("Discovery found {} model(s)", names.len());

    if output.format() != OutputFormat::Human {
        return output.data(&names);
    }

    output.section(&title)?;
    if names.is_empty() {
        return output.info("No bridges registered");
    }
    for name in &names {
        output.writeln(&format!("  • {}", name))?;
    }
    Ok(())
}
