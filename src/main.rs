use anyhow::Result;
use clap::Parser;
use livetrans::cli::Cli;
use livetrans::config::Config;
use livetrans::pipeline::coordinator::{Pipeline, PipelineConfig};
use livetrans::speech::lines::LineTranscriptSource;
use livetrans::synth::synthesizer::NullSynthesizer;
use livetrans::transcript::EntryId;
use livetrans::translate::client::HttpTranslator;
use owo_colors::OwoColorize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let pipeline_config = apply_cli_overrides(PipelineConfig::from_config(&config), &cli);

    let translator = HttpTranslator::new(
        cli.endpoint.as_deref().unwrap_or(&config.translation.base_url),
        &config.translation.api_key,
        cli.model.as_deref().unwrap_or(&config.translation.model),
    )?;

    let source = LineTranscriptSource::stdin();
    let (synthesizer, synth_events) = NullSynthesizer::new();

    let handle = Pipeline::start(
        pipeline_config,
        source,
        Arc::new(translator),
        Box::new(synthesizer),
        synth_events,
    );

    if !cli.quiet {
        eprintln!(
            "livetrans: type partial transcripts, pause {}ms to finalize, Ctrl-C to quit",
            config.recognition.silence_duration_ms
        );
    }

    handle.start_recording().await;
    render_loop(&handle, cli.quiet).await;
    handle.shutdown().await;
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)?,
            None => Config::default(),
        },
    };
    Ok(config.with_env_overrides())
}

fn apply_cli_overrides(mut config: PipelineConfig, cli: &Cli) -> PipelineConfig {
    if let Some(from) = &cli.from {
        config.source_language = from.clone();
    }
    if let Some(to) = &cli.to {
        config.target_language = to.clone();
    }
    if let Some(silence) = cli.silence {
        config.silence_duration = silence;
    }
    if cli.auto_speak {
        config.auto_speak = true;
    }
    config
}

/// Prints each entry once when it finalizes and once more when its
/// translation arrives.
async fn render_loop(handle: &livetrans::PipelineHandle, quiet: bool) {
    let mut transcript = handle.transcript();
    let mut status = handle.status();
    // Tracks what has been printed per entry: false = source only.
    let mut printed: HashMap<EntryId, bool> = HashMap::new();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = transcript.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = transcript.borrow_and_update().clone();
                for entry in &snapshot {
                    match printed.get(&entry.id) {
                        None => {
                            println!("{} {}", entry.id.to_string().dimmed(), entry.source_text.bold());
                            if let Some(translation) = &entry.translated_text {
                                println!("{}   {}", " ".dimmed(), translation.green());
                                printed.insert(entry.id, true);
                            } else {
                                printed.insert(entry.id, false);
                            }
                        }
                        Some(false) => {
                            if let Some(translation) = &entry.translated_text {
                                println!("{}   {}", " ".dimmed(), translation.green());
                                printed.insert(entry.id, true);
                            }
                        }
                        Some(true) => {}
                    }
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                if let Some(message) = status.borrow_and_update().clone()
                    && !quiet
                {
                    eprintln!("livetrans: {}", message.red());
                }
            }
        }
    }
}
