use demand_forecast::config::EvaluatorConfig;
use demand_forecast::evaluate::{evaluate_dataset, read_dataset, write_results};
use demand_forecast::model::ModelBundle;

fn main() {
    println!("Starting the evaluation job...");

    let cfg = EvaluatorConfig::default();
    let missing = cfg.missing_inputs();
    if !missing.is_empty() {
        for path in missing {
            println!("Error: could not find required input '{}'", path.display());
        }
        return;
    }

    let bundle = match ModelBundle::load(&cfg.model) {
        Ok(bundle) => bundle,
        Err(err) => {
            println!("Error loading the model bundle: {err}");
            return;
        }
    };
    println!("Loaded model and categories from '{}'", cfg.model.display());

    let dataset = match read_dataset(&cfg.dataset) {
        Ok(dataset) => dataset,
        Err(err) => {
            println!("Error loading the evaluation data: {err}");
            return;
        }
    };
    println!("Loaded evaluation data from '{}'", cfg.dataset.display());

    println!("Aligning categorical features and scoring...");
    let mut evaluation = match evaluate_dataset(&bundle, &dataset) {
        Ok(evaluation) => evaluation,
        Err(err) => {
            println!("Error scoring the evaluation data: {err}");
            return;
        }
    };
    println!("{}", evaluation.report);

    if let Err(err) = write_results(&mut evaluation.results, &cfg.results) {
        println!("Error writing the results table: {err}");
        return;
    }
    println!("Saved evaluation results to '{}'", cfg.results.display());
}
