use warpgrid::config::SceneConfig;
use warpgrid::viewer::Viewer;

fn main() {
    if let Err(e) = Viewer::new(SceneConfig::default()).run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
