use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = tree_visualizer::config::Config::parse();
    tree_visualizer::app::run(cfg)
}
