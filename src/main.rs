//! CLI entry point for carnet

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carnet::commands::{self, show::View};
use carnet::i18n::Locale;
use carnet::Carnet;

#[derive(Parser)]
#[command(name = "carnet")]
#[command(version)]
#[command(about = "Content pipeline of a bilingual blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts, newest first, grouped by year
    #[command(alias = "ls")]
    List {
        /// Only list this locale (fr, en)
        #[arg(short, long)]
        lang: Option<Locale>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Render a post with its table of contents and navigation, as JSON
    Show {
        lang: Locale,
        slug: String,

        /// Print only the rendered HTML
        #[arg(long)]
        html: bool,
    },

    /// Print the table of contents of a post
    Toc { lang: Locale, slug: String },

    /// Print the previous, next and related posts of a post
    Nav { lang: Locale, slug: String },

    /// List tags, or the posts carrying a tag
    Tags {
        lang: Locale,
        tag: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print sitemap.xml
    Sitemap {
        /// Write sitemap.xml and robots.txt into this directory instead
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print robots.txt
    Robots,

    /// Start the JSON server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "carnet=debug,info"
    } else {
        "carnet=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let carnet = Carnet::new(&base_dir)?;

    match cli.command {
        Commands::List { lang, json } => commands::list::run(&carnet, lang, json)?,

        Commands::Show { lang, slug, html } => {
            let view = if html { View::Html } else { View::Page };
            commands::show::run(&carnet, lang, &slug, view)?;
        }

        Commands::Toc { lang, slug } => commands::show::run(&carnet, lang, &slug, View::Toc)?,

        Commands::Nav { lang, slug } => commands::show::run(&carnet, lang, &slug, View::Nav)?,

        Commands::Tags { lang, tag, json } => {
            commands::tags::run(&carnet, lang, tag.as_deref(), json)?
        }

        Commands::Sitemap { output } => commands::sitemap::run(&carnet, output.as_deref())?,

        Commands::Robots => commands::sitemap::robots(&carnet)?,

        Commands::Serve { port, ip } => {
            tracing::info!("Serving {:?}", carnet.posts_dir);
            carnet::server::start(carnet, &ip, port).await?;
        }
    }

    Ok(())
}
