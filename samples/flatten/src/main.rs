use std::{path::Path, process::ExitCode};

use clap::Parser;
use collate::ArrayIndex;

mod cli;
mod load;

use cli::{Cli, IndexWidth};
use load::LoadError;

/// Load, collate, and summarize one glTF file.
fn flatten<Idx: ArrayIndex + Send + Sync>(path: &Path) -> Result<(), LoadError> {
    let mut geometry = load::load::<Idx>(path)?;
    geometry
        .build_vertex_array()
        .map_err(|e| LoadError::Collate(Box::new(e)))?;

    for shape in geometry.shapes() {
        let shape = shape.read();
        let (offset, count) = shape.vertex_offset_and_count();
        let center = shape.center_of_mass();
        tracing::info!(
            name = shape.user_data::<String>().map(String::as_str),
            offset,
            count,
            center = %format!("[{:.3}, {:.3}, {:.3}]", center.x, center.y, center.z),
            attributes = shape.attribute_table().len(),
            "shape"
        );
    }
    tracing::info!(
        path = ?path,
        shapes = geometry.shapes().len(),
        vertices = geometry.model_vertices().len(),
        triangles = geometry.triangle_count(),
        vertex_bytes = hedron::as_bytes(geometry.model_vertices()).len(),
        index_bytes = geometry.model_indices().len() * std::mem::size_of::<Idx>(),
        "collated model"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_logging(&cli);

    let mut status = ExitCode::SUCCESS;
    for file in &cli.files {
        let res = match cli.index_width {
            IndexWidth::U16 => flatten::<u16>(file),
            IndexWidth::U32 => flatten::<u32>(file),
        };
        if let Err(e) = res {
            tracing::error!(path = ?file, "{e}");
            status = ExitCode::FAILURE;
        }
    }
    status
}
