use demand_forecast::config::BuilderConfig;
use demand_forecast::dataset::{build_weekly_dataset, write_dataset, RawSources};

fn main() {
    println!("Starting the dataset builder...");

    let cfg = BuilderConfig::default();
    let missing = cfg.missing_inputs();
    if !missing.is_empty() {
        for path in missing {
            println!("Error: could not find required input '{}'", path.display());
        }
        return;
    }

    let sources = match RawSources::load(&cfg) {
        Ok(sources) => sources,
        Err(err) => {
            println!("Error loading the raw sources: {err}");
            return;
        }
    };
    println!("Loaded stores, transactions, and products.");

    let mut weekly = match build_weekly_dataset(&sources) {
        Ok(weekly) => weekly,
        Err(err) => {
            println!("Error building the weekly dataset: {err}");
            return;
        }
    };
    println!("Aggregated {} weekly rows.", weekly.height());

    if let Err(err) = write_dataset(&mut weekly, &cfg.output) {
        println!("Error writing the weekly dataset: {err}");
        return;
    }
    println!("Saved the weekly dataset to '{}'", cfg.output.display());
}
