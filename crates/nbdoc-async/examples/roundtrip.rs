//! Write an empty notebook to disk, read it back, and validate it.

use nbdoc::{Document, Options, VersionSpec};
use nbdoc_async::ValidateOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("demo.ipynb");

    let nb = Document::new(4, 5);
    nbdoc_async::write(&nb, path.as_path(), VersionSpec::NoConvert, &Options::default()).await?;

    let back =
        nbdoc_async::read(path.as_path(), VersionSpec::major(4), &Options::default()).await?;
    println!(
        "read nbformat {}.{} with {} cells",
        back.nbformat().unwrap_or(0),
        back.nbformat_minor().unwrap_or(0),
        back.cells().map_or(0, Vec::len),
    );

    nbdoc_async::validate(Some(&back), &ValidateOptions::new()).await?;
    println!("notebook conforms to the v4 schema");
    Ok(())
}
