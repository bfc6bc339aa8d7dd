//! Bridge subcommand handlers

use super::{read_data_arg, AppContext};
use crate::cli::{
    BridgeAction, BridgeArgs, BridgeCreateArgs, BridgeShowArgs, BridgeTestArgs,
    BridgeValidateArgs, OutputFormat,
};
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use graphbridge_core::{
    Bridge, BridgeComponent, BridgeMetadata, EtlComponent, EtlContext, FieldRule,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Dispatch a bridge subcommand
pub async fn handle_bridge(
    args: BridgeArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        BridgeAction::List => list_bridges(ctx, output),
        BridgeAction::Show(args) => show_bridge(args, ctx, output),
        BridgeAction::Create(args) => create_bridge(args, ctx, output),
        BridgeAction::Validate(args) => validate_bridge(args, ctx, output),
        BridgeAction::Test(args) => test_bridge(args, ctx, output).await,
    }
}

#[instrument(skip(ctx, output))]
fn list_bridges(ctx: &AppContext, output: &mut OutputWriter) -> Result<()> {
    let bridges = ctx.bridges.bridges();
    info!("Listing {} bridge(s)", bridges.len());

    if output.format() != OutputFormat::Human {
        let records: Vec<&Bridge> = bridges.iter().map(|b| b.as_ref()).collect();
        return output.data(&records);
    }

    if bridges.is_empty() {
        return output.info("No bridges registered");
    }

    let rows = bridges
        .iter()
        .map(|bridge| {
            vec![
                bridge.id.clone(),
                bridge.version.clone(),
                bridge.source.clone(),
                bridge.target.clone(),
                format!("{:.2}", bridge.metadata.efficiency),
                format!("{:.2}", bridge.metadata.confidence),
            ]
        })
        .collect();

    output.table(
        &["ID", "VERSION", "SOURCE", "TARGET", "EFFICIENCY", "CONFIDENCE"],
        rows,
    )
}

#[instrument(skip(args, ctx, output), fields(bridge_id = %args.id))]
fn show_bridge(args: BridgeShowArgs, ctx: &AppContext, output: &mut OutputWriter) -> Result<()> {
    let bridge = ctx
        .bridges
        .bridge_by_id(&args.id)
        .ok_or_else(|| Error::UnknownBridge {
            id: args.id.clone(),
        })?;

    output.section(&format!("Bridge '{}'", bridge.id))?;
    output.data(bridge.as_ref())
}

#[instrument(
    skip(args, ctx, output),
    fields(bridge_id = %args.id, source = %args.source, target = %args.target)
)]
fn create_bridge(
    args: BridgeCreateArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("bridge_create", &format!("bridge: {}", args.id));

    if !(0.0..=1.0).contains(&args.efficiency) {
        return Err(Error::invalid_args("efficiency must be between 0 and 1"));
    }
    if !(0.0..=1.0).contains(&args.confidence) {
        return Err(Error::invalid_args("confidence must be between 0 and 1"));
    }

    debug!("Parsing mapping rules");
    let mappings: BTreeMap<String, FieldRule> =
        serde_json::from_value(read_data_arg(&args.mappings)?)?;
    let transformations: BTreeMap<String, String> = match &args.transformations {
        Some(arg) => serde_json::from_value(read_data_arg(arg)?)?,
        None => BTreeMap::new(),
    };

    for transform_id in transformations.values() {
        if !ctx.transforms.contains(transform_id) {
            output.warning(&format!(
                "⚠ Transform '{}' is not registered; records using it will fail",
                transform_id
            ))?;
        }
    }

    let bridge = Bridge {
        id: args.id,
        version: args.version,
        source: args.source,
        target: args.target,
        mappings,
        transformations,
        metadata: BridgeMetadata {
            efficiency: args.efficiency,
            confidence: args.confidence,
            ..Default::default()
        },
    };

    let id = bridge.id.clone();
    let replacing = ctx.bridges.bridge_by_id(&id).is_some();

    ctx.bridges.register(bridge)?;
    ctx.store.save(&ctx.bridges)?;

    info!("Bridge '{}' persisted to {:?}", id, ctx.store.path());
    if replacing {
        output.success(&format!("✓ Bridge '{}' updated", id))
    } else {
        output.success(&format!("✓ Bridge '{}' registered", id))
    }
}

#[instrument(skip(args, ctx, output), fields(bridge_id = %args.id))]
fn validate_bridge(
    args: BridgeValidateArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    let bridge = ctx
        .bridges
        .bridge_by_id(&args.id)
        .ok_or_else(|| Error::UnknownBridge {
            id: args.id.clone(),
        })?;

    if !ctx.bridges.validate(&bridge) {
        output.error(&format!("✗ Bridge '{}' failed structural checks", bridge.id))?;
        return Err(Error::Engine(graphbridge_core::Error::BridgeValidation {
            bridge_id: bridge.id.clone(),
            reason: "structural checks failed".to_string(),
        }));
    }

    let missing: Vec<&str> = bridge
        .mappings
        .values()
        .filter_map(|rule| match rule {
            FieldRule::Transform { transform_id, .. } => Some(transform_id.as_str()),
            _ => None,
        })
        .chain(bridge.transformations.values().map(String::as_str))
        .filter(|id| !ctx.transforms.contains(id))
        .collect();

    if missing.is_empty() {
        output.success(&format!("✓ Bridge '{}' is valid", bridge.id))
    } else {
        for transform_id in &missing {
            output.warning(&format!("⚠ Transform '{}' is not registered", transform_id))?;
        }
        output.success(&format!(
            "✓ Bridge '{}' is structurally valid ({} unresolved transform(s))",
            bridge.id,
            missing.len()
        ))
    }
}

#[instrument(skip(args, ctx, output), fields(bridge_id = %args.id))]
async fn test_bridge(
    args: BridgeTestArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("bridge_test", &format!("bridge: {}", args.id));

    let bridge = ctx
        .bridges
        .bridge_by_id(&args.id)
        .ok_or_else(|| Error::UnknownBridge {
            id: args.id.clone(),
        })?;

    let data = read_data_arg(&args.data)?;
    let component = BridgeComponent::new(
        Arc::clone(&bridge),
        Arc::clone(&ctx.bridges),
        Arc::clone(&ctx.transforms),
    );
    let context = EtlContext::new(&bridge.source, &bridge.target, data);

    debug!("Running bridge '{}' against sample data", bridge.id);
    let result = component.execute(context).await?;

    output.success(&format!("✓ Bridge '{}' test run completed", bridge.id))?;
    output.etl_result(&result)
}
