use std::path::Path;

use color_eyre::{
    Result,
    eyre::{Context, bail},
};

use wmf2svg::{ConvertOptions, convert};

fn main() -> Result<()> {
    color_eyre::install()?;

    let paths = std::env::args().skip(1);
    let mut any = false;

    for path in paths {
        any = true;
        process_file(&path).wrap_err_with(|| format!("converting {path}"))?;
    }

    if !any {
        bail!("usage: wmf2svg <file.wmf>...");
    }

    Ok(())
}

fn process_file(path: &str) -> Result<()> {
    let data = std::fs::read(path)?;
    let svg = convert(&data, &ConvertOptions::default())
        .map_err(|e| color_eyre::eyre::eyre!(e))
        .wrap_err("conversion failed")?;

    let out_path = Path::new(path).with_extension("svg");
    std::fs::write(&out_path, svg)?;
    eprintln!("wrote {}", out_path.display());

    Ok(())
}
