//! # chatlens CLI
//!
//! Command-line interface for the chatlens library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use chatlens::ChatParser;
use chatlens::ChatlensError;
use chatlens::cli::Args;
use chatlens::core::apply_filters;
use chatlens::format::write_to_format;

fn main() {
    let args = <Args as ClapParser>::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(&args) {
        eprintln!("❌ Error ({}): {}", e.user_hint(), e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), ChatlensError> {
    let total_start = Instant::now();
    let filter = args.filter_config()?;
    let (output_path, format) = args.output_target()?;

    println!("🔎 chatlens v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", output_path.display());
    println!("📄 Format:  {format}");
    if let Some(after) = &args.after {
        println!("📅 After:   {after}");
    }
    if let Some(before) = &args.before {
        println!("📅 Before:  {before}");
    }
    if let Some(from) = &args.from {
        println!("👤 From:    {from}");
    }
    println!();

    let parser = ChatParser::with_config(args.parser_config());
    let chat = parser.parse_file(&args.input)?;
    let report = chat.report();

    let selected = apply_filters(chat.messages(), &filter);
    if filter.is_active() {
        println!("🔍 {} of {} messages match the filters", selected.len(), chat.len());
    }

    write_to_format(&selected, &output_path, format)?;

    println!("✅ Done! Output saved to {}", output_path.display());
    println!();
    println!("📊 Summary:");
    for line in report.to_string().lines() {
        println!("   {line}");
    }
    println!("   Senders:    {}", chat.senders().len());
    println!("   Written:    {} records", selected.len());
    println!(
        "   Total time: {:.2}s",
        total_start.elapsed().as_secs_f64()
    );

    Ok(())
}
