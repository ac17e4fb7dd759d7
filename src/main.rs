mod app;
mod people;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Snapshot source: a path to a graph JSON file or an http(s) URL.
    #[arg(long, default_value = "graph.json")]
    graph: String,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "people-graph",
        options,
        Box::new(move |cc| Ok(Box::new(app::PeopleGraphApp::new(cc, args.graph.clone())))),
    )
}
