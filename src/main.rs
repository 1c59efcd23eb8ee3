use evergreen::{Scene, TreeConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional first argument: number of needle points
    let foliage_count = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                log::warn!("Ignoring foliage count {arg:?}, expected a whole number");
                TreeConfig::DEFAULT_FOLIAGE_COUNT
            }
        },
        None => TreeConfig::DEFAULT_FOLIAGE_COUNT,
    };

    if let Err(err) = Scene::new().with_foliage_count(foliage_count).run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
