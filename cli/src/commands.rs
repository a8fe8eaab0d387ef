use std::io::Write;
use std::time::Instant;

use fusebox_core::{Clock, FuseBuilder, FuseError, FuseboxConfig, FuseboxConfigExt, PollStatus};

use crate::ShellContext;
use crate::demo::print_fired;

/// Fire whatever expired since the last command
pub fn poll_pending(ctx: &mut ShellContext) {
    let fired = ctx.fuses.poll_all();
    if fired > 0 && ctx.config.driver.log_fired {
        tracing::info!(fired, live = ctx.fuses.len(), "fuses fired");
    }
}

pub fn add(
    ctx: &mut ShellContext,
    secs: u64,
    message: &str,
    label: Option<&str>,
) -> Result<(), FuseError> {
    let mut builder = FuseBuilder::new()
        .payload(message.to_string())
        .duration_secs(secs)
        .on_expire(print_fired);
    if let Some(label) = label {
        builder = builder.label(label);
    }
    let id = ctx.fuses.insert(builder)?;
    println!("armed fuse {} at position {}", id, ctx.fuses.len() - 1);
    Ok(())
}

pub fn remove(ctx: &mut ShellContext, index: usize) -> Result<(), FuseError> {
    let message = ctx.fuses.remove_at(index)?;
    println!("disarmed: {}", message);
    Ok(())
}

pub fn poll(ctx: &mut ShellContext, index: usize) -> Result<(), FuseError> {
    let id = ctx.id_at(index)?;
    match ctx.fuses.poll(id)? {
        PollStatus::Fired => {}
        PollStatus::Pending { remaining } => {
            println!("fuse {} pending, {:.1}s left", id, remaining.as_secs_f32());
        }
    }
    Ok(())
}

pub fn poll_all(ctx: &mut ShellContext) {
    let fired = ctx.fuses.poll_all();
    println!("{} fired, {} live", fired, ctx.fuses.len());
}

pub fn reset(ctx: &mut ShellContext, index: usize) -> Result<(), FuseError> {
    let id = ctx.id_at(index)?;
    ctx.fuses.reset(id)?;
    println!("fuse {} re-armed", id);
    Ok(())
}

pub fn reset_all(ctx: &mut ShellContext) {
    ctx.fuses.reset_all();
    println!("{} fuses re-armed", ctx.fuses.len());
}

pub fn clear(ctx: &mut ShellContext) {
    let count = ctx.fuses.len();
    ctx.fuses.clear();
    println!("disarmed {} fuses", count);
}

pub fn list(ctx: &ShellContext) {
    if ctx.fuses.is_empty() {
        println!("No live fuses");
        return;
    }

    let now: Instant = ctx.fuses.clock().now();
    println!("{:<5} {:<6} {:<12} {:>9}  Message", "Pos", "Id", "Label", "Left");
    println!("{}", "-".repeat(60));
    for (pos, fuse) in ctx.fuses.iter().enumerate() {
        println!(
            "{:<5} {:<6} {:<12} {:>8.1}s  {}",
            pos,
            fuse.id(),
            fuse.label().unwrap_or("-"),
            fuse.remaining(now).as_secs_f32(),
            fuse.payload()
        );
    }
}

pub fn show_config(ctx: &ShellContext) {
    match FuseboxConfig::path() {
        Ok(path) => println!("config file: {}", path.display()),
        Err(e) => println!("{}", e),
    }
    println!("{:#?}", ctx.config);
}

pub fn exit() -> Result<(), String> {
    writeln!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}
