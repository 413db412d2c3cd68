mod health_check;
mod submission;

pub use health_check::*;
pub use submission::*;

/// Walk the source chain of `e` so operator logs show the whole story, not
/// just the outermost message
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }
    Ok(())
}
