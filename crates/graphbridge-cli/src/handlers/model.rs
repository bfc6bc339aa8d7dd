//! Model subcommand handlers

use super::AppContext;
use crate::cli::{
    ModelAction, ModelArgs, ModelCompatibleArgs, ModelRegisterArgs, ModelShowArgs, OutputFormat,
};
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use tracing::{info, instrument};

/// Dispatch a model subcommand
pub async fn handle_model(
    args: ModelArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        ModelAction::List => list_models(ctx, output),
        ModelAction::Show(args) => show_model(args, ctx, output),
        ModelAction::Register(args) => register_model(args, ctx, output),
        ModelAction::Compatible(args) => compatible_models(args, ctx, output),
    }
}

#[instrument(skip(ctx, output))]
fn list_models(ctx: &AppContext, output: &mut OutputWriter) -> Result<()> {
    let names = ctx.models.model_names();
    info!("Listing {} model(s)", names.len());

    if output.format() != OutputFormat::Human {
        return output.data(&names);
    }

    if names.is_empty() {
        return output.info("No models registered");
    }

    let mut rows = Vec::with_capacity(names.len());
    for name in &names {
        let model = ctx.models.get_model(name)?;
        rows.push(vec![
            model.name.clone(),
            model.version.clone(),
            model.schema.entities.len().to_string(),
        ]);
    }

    output.table(&["NAME", "VERSION", "ENTITIES"], rows)
}

#[instrument(skip(args, ctx, output), fields(model = %args.name))]
fn show_model(args: ModelShowArgs, ctx: &AppContext, output: &mut OutputWriter) -> Result<()> {
    let model = ctx.models.get_model(&args.name)?;

    output.section(&format!("Model '{}'", model.name))?;
    output.data(model.as_ref())
}

#[instrument(skip(args, ctx, output), fields(file = %args.file.display(), force = args.force))]
fn register_model(
    args: ModelRegisterArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details(
        "model_register",
        &format!("file: {}", args.file.display()),
    );

    let name = ctx
        .library
        .register_file(&args.file, &ctx.models, args.force)?;

    info!("Model '{}' added to {:?}", name, ctx.library.dir());
    output.success(&format!("✓ Model '{}' registered", name))
}

#[instrument(skip(args, ctx, output), fields(model = %args.name, direction = ?args.direction))]
fn compatible_models(
    args: ModelCompatibleArgs,
    ctx: &AppContext,
    output: &mut OutputWriter,
) -> Result<()> {
    let names = ctx
        .models
        .compatible_models(&args.name, args.direction.into())?;

    info!("Model '{}' declares {} compatible model(s)", args.name, names.len());

    if output.format() != OutputFormat::Human {
        return output.data(&names);
    }

    output.section(&format!("Models compatible with '{}'", args.name))?;
    if names.is_empty() {
        return output.info("No declared compatibilities");
    }
    for name in &names {
        output.writeln(&format!("  • {}", name))?;
    }
    Ok(())
}
