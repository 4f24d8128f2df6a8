/**
 * Background cosmology for Big-Bang nucleosynthesis
 */




// ============================================================================
use bbn_cosmo::app::{self, App};
use bbn_cosmo::io;
use bbn_cosmo::products::Products;




// ============================================================================
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let input = match std::env::args().nth(1) {
        None => anyhow::bail!("no input file given (a config.yaml, or the preset standard_model)"),
        Some(input) => input,
    };
    let patches: Vec<String> = std::env::args().skip(2).collect();
    let app = App::from_preset_or_file(&input, &patches)?.validate()?;

    println!();
    println!("\t{}", app::DESCRIPTION);
    println!("\t{}", app::VERSION_AND_BUILD);
    println!();
    println!("\tinput file ........ {}", input);
    println!("\tcosmo table ....... {}", app.table_path().display());
    println!("\toutput file ....... {}", app.output_path().display());
    println!();

    let cosmology = app.load_cosmology()?;
    let products = Products::from_cosmology(&cosmology, &app.config)?;

    println!("\t{:>12} {:>12} {:>12} {:>12} {:>12}", "T [GeV]", "t [s]", "t_bisect [s]", "Tnu [GeV]", "nb/eta");
    for sample in &products.samples {
        println!(
            "\t{:>12.5e} {:>12.5e} {:>12.5e} {:>12.5e} {:>12.5e}",
            sample.temperature,
            sample.time,
            sample.time_by_bisection,
            sample.neutrino_temperature,
            sample.eta_ratio,
        );
    }
    println!();
    println!("\tlargest lookup/bisection difference ... {:.3e}", products.max_relative_difference());
    println!();

    io::write_cbor(&products, app.output_path())?;

    if let Some(table_output) = app.table_output_path() {
        io::write_cbor(cosmology.table(), table_output)?;
    }
    cosmology.release();

    Ok(())
}
