use vergen_gitcl::{Emitter, GitclBuilder};

// Branch, sha and dirty flag end up in `--version` and the startup log line.
fn main() -> anyhow::Result<()> {
    let git = GitclBuilder::default().branch(true).sha(true).dirty(true).build()?;
    Emitter::default().add_instructions(&git)?.emit()?;
    Ok(())
}
