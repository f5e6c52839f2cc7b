use match3d::benchmark::{
    load_search_results, summarize, write_html_report, ApprovedNames, Benchmarker, GoldenTable,
};
use match3d::config::golden_report;
use match3d::image::io::write_json_file;
use match3d::{Error, Result};
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = golden_report::load_config(Path::new(&config_path))?;

    let table = GoldenTable::from_path(&config.golden)?;
    let approved = config
        .approved_names
        .as_ref()
        .map(|path| ApprovedNames::from_path(path))
        .transpose()?;
    let bench = Benchmarker::new(&table, approved.as_ref())?;
    let searches = load_search_results(&config.search_results)?;

    let summary = summarize(&bench, &searches);
    print!("{summary}");

    if let Some(path) = &config.output.summary_json {
        write_json_file(path, &summary)?;
        println!("\nJSON summary written to {}", path.display());
    }
    if let Some(html) = &config.output.html {
        write_html_report(&bench, &searches, &html.image_dir, &html.out)?;
        println!("HTML report written to {}", html.out.display());
    }
    Ok(())
}

fn usage() -> Error {
    Error::Config("Usage: golden_report <config.json>".to_string())
}
