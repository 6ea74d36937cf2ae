#[cfg(feature = "gui")]
use clap::Parser;
#[cfg(feature = "gui")]
use eframe::{
    NativeOptions,
    egui::{IconData, ViewportBuilder},
};
#[cfg(feature = "gui")]
use ms2rescore_gui::{Resources, gui::Ms2RescoreGui};
#[cfg(feature = "gui")]
use std::path::{Path, PathBuf};

#[cfg(feature = "gui")]
#[derive(Parser, Debug)]
#[command(name = "ms2rescoreUI", version, about = "MS²Rescore graphical front-end")]
struct GuiArgs {
    /// Directory holding the program icon and other images
    #[arg(long)]
    image_dir: Option<PathBuf>,
}

#[cfg(feature = "gui")]
fn load_icon(path: &Path) -> Option<IconData> {
    match image::open(path) {
        Ok(image) => {
            let image = image.to_rgba8();
            let (width, height) = image.dimensions();
            Some(IconData {
                rgba: image.into_raw(),
                width,
                height,
            })
        }
        Err(e) => {
            eprintln!("Warning: could not load window icon {:?}: {}", path, e);
            None
        }
    }
}

#[cfg(feature = "gui")]
fn main() -> Result<(), eframe::Error> {
    let args = GuiArgs::parse();
    let resources = Resources::locate(args.image_dir);

    let mut viewport = ViewportBuilder::default()
        .with_inner_size([760.0, 720.0])
        .with_min_inner_size([600.0, 400.0]);
    if let Some(icon) = resources.program_icon().as_deref().and_then(load_icon) {
        viewport = viewport.with_icon(icon);
    }

    let options = NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "MS²Rescore",
        options,
        Box::new(|_cc| Ok(Box::new(Ms2RescoreGui::new(resources)))),
    )
}

#[cfg(not(feature = "gui"))]
fn main() {
    eprintln!("GUI feature is not enabled. Please build with --features gui");
    std::process::exit(1);
}
