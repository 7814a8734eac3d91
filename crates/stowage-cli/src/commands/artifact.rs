use anyhow::{Result, bail};
use std::io::{self, Write};
use std::path::Path;

use stowage_core::{Artifact, ArtifactExt, ArtifactRecord};

use super::Context;
use crate::cli::{ArtifactArgs, Commands};

pub fn handle(cmd: Commands, ctx: &Context) -> Result<()> {
    match cmd {
        Commands::Upload {
            local_path,
            target_path,
            kind,
            uri,
        } => {
            let record = upload(ctx, &local_path, &target_path, kind, uri)?;
            eprintln!("✓ Uploaded {} → {}", local_path.display(), record.uri);
            print_record(&record)
        }
        Commands::Download { artifact, target } => {
            let record = download(ctx, &artifact, &target)?;
            eprintln!("✓ Downloaded to {}", record.uri);
            print_record(&record)
        }
        Commands::Cat { artifact } => cat(ctx, &artifact, &mut io::stdout().lock()),
        Commands::Relocate { artifact, base } => {
            let record = relocate(ctx, &artifact, &base)?;
            print_record(&record)
        }
    }
}

fn print_record(record: &ArtifactRecord) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

fn read_record(path: &Path) -> Result<ArtifactRecord> {
    let content = if path == Path::new("-") {
        io::read_to_string(io::stdin())?
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&content)?)
}

fn load(ctx: &Context, args: &ArtifactArgs) -> Result<Box<dyn Artifact>> {
    let record = match (&args.record, &args.uri) {
        (Some(path), _) => read_record(path)?,
        (None, Some(uri)) => ArtifactRecord::new(args.kind.as_str(), uri.as_str(), None),
        (None, None) => bail!("Pass either --record or --uri"),
    };

    Ok(ctx.registry.artifact(&record)?)
}

fn upload(
    ctx: &Context,
    local_path: &Path,
    target_path: &str,
    kind: Option<String>,
    uri: Option<String>,
) -> Result<ArtifactRecord> {
    let mut record = ctx.settings.storage.clone();
    if let Some(kind) = kind {
        record.kind = kind;
    }
    if let Some(uri) = uri {
        record.uri = uri;
    }

    let storage = ctx.registry.storage(&record)?;
    let artifact = storage.upload(local_path, target_path)?;
    Ok(artifact.record())
}

fn download(ctx: &Context, args: &ArtifactArgs, target: &Path) -> Result<ArtifactRecord> {
    let artifact = load(ctx, args)?;
    let local = artifact.download(target)?;
    Ok(local.record())
}

fn cat(ctx: &Context, args: &ArtifactArgs, out: &mut impl Write) -> Result<()> {
    let artifact = load(ctx, args)?;
    artifact.with_stream(|stream| {
        io::copy(stream, out)?;
        Ok(())
    })?;
    out.flush()?;
    Ok(())
}

fn relocate(ctx: &Context, args: &ArtifactArgs, base: &str) -> Result<ArtifactRecord> {
    let artifact = load(ctx, args)?;
    let (fs, path) = ctx.registry.backends().resolver.resolve(base)?;
    Ok(artifact.relative(&fs, &path).record())
}
