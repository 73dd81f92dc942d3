use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = webnorm::cli::parse();
    app::run(args)
}
