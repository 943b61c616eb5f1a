//! skillpack slug - Derive slugs from names

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::emit_json;
use crate::error::Result;
use crate::package::slugify;

#[derive(Args, Debug)]
pub struct SlugArgs {
    /// Names to slugify
    #[arg(required = true)]
    pub names: Vec<String>,
}

#[derive(Serialize)]
struct SlugRow<'a> {
    name: &'a str,
    slug: String,
}

pub fn run(ctx: &AppContext, args: &SlugArgs) -> Result<()> {
    let rows: Vec<SlugRow<'_>> = args
        .names
        .iter()
        .map(|name| SlugRow {
            name,
            slug: slugify(name),
        })
        .collect();

    if ctx.machine() {
        return emit_json(&rows);
    }
    for row in rows {
        println!("{}", row.slug);
    }
    Ok(())
}
