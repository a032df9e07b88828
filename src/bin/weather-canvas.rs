//! CLI for Weather Canvas.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use weather_canvas::weather::{suggest_cities, today, PLACEHOLDER_LOCATION};
use weather_canvas::{
    compositor, CanvasSession, FontSet, GeminiImageProvider, GeminiTextProvider, GeneratedImage,
    ImageStyle, TemperatureUnit, WeatherCondition, WeatherFetcher, WeatherState,
};

#[derive(Parser)]
#[command(name = "weather-canvas")]
#[command(about = "Generate stylized AI weather canvases for any city (Gemini)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Regular font for the overlay (TTF/OTF)
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Bold font for the overlay (TTF/OTF)
    #[arg(long, global = true)]
    bold_font: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List cities with notable weather right now
    Trends,

    /// Look up the current weather for a city
    Weather {
        /// City name, e.g. "Tokyo, Japan"
        city: String,
    },

    /// Suggest city names matching a query
    Cities {
        /// Part of a city name
        query: String,
    },

    /// Print the image prompt for a weather state
    Prompt(StateArgs),

    /// Generate a canvas and save it with the overlay baked in
    Generate(GenerateArgs),

    /// Bake the overlay into an existing image
    Compose(ComposeArgs),
}

#[derive(Args, Clone)]
struct StateArgs {
    /// City name, e.g. "Tokyo, Japan"
    #[arg(short, long)]
    city: Option<String>,

    /// Weather condition
    #[arg(long, value_enum, default_value = "sunny")]
    condition: ConditionArg,

    /// Temperature
    #[arg(short, long, default_value_t = 24, allow_negative_numbers = true)]
    temperature: i32,

    /// Temperature unit
    #[arg(short, long, value_enum, default_value = "c")]
    unit: UnitArg,

    /// Date line (defaults to today)
    #[arg(short, long)]
    date: Option<String>,

    /// Art style
    #[arg(short, long, value_enum, default_value = "isometric")]
    style: StyleArg,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    state: StateArgs,

    /// Fill condition and temperature from live weather
    #[arg(long)]
    live: bool,

    /// Use the current location instead of --city
    #[arg(long, conflicts_with = "city")]
    here: bool,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Also save the image without overlay to this path
    #[arg(long)]
    raw_output: Option<PathBuf>,
}

#[derive(Args)]
struct ComposeArgs {
    /// Image to decorate (file path or data URL)
    image: String,

    #[command(flatten)]
    state: StateArgs,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConditionArg {
    Sunny,
    Cloudy,
    Rain,
    Storm,
    Snow,
    Fog,
}

impl From<ConditionArg> for WeatherCondition {
    fn from(arg: ConditionArg) -> Self {
        match arg {
            ConditionArg::Sunny => WeatherCondition::Sunny,
            ConditionArg::Cloudy => WeatherCondition::Cloudy,
            ConditionArg::Rain => WeatherCondition::Rain,
            ConditionArg::Storm => WeatherCondition::Storm,
            ConditionArg::Snow => WeatherCondition::Snow,
            ConditionArg::Fog => WeatherCondition::Fog,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnitArg {
    C,
    F,
}

impl From<UnitArg> for TemperatureUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::C => TemperatureUnit::C,
            UnitArg::F => TemperatureUnit::F,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Isometric,
    Realistic,
    Cartoonish,
    Cyberpunk,
}

impl From<StyleArg> for ImageStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Isometric => ImageStyle::Isometric,
            StyleArg::Realistic => ImageStyle::Realistic,
            StyleArg::Cartoonish => ImageStyle::Cartoonish,
            StyleArg::Cyberpunk => ImageStyle::Cyberpunk,
        }
    }
}

impl StateArgs {
    fn to_state(&self) -> WeatherState {
        WeatherState::for_city(self.city.clone().unwrap_or_default())
            .with_condition(self.condition.into())
            .with_temperature(self.temperature, self.unit.into())
            .with_date(self.date.clone().unwrap_or_else(today))
            .with_style(self.style.into())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Trends => show_trends(cli.json).await?,
        Commands::Weather { ref city } => show_weather(city, cli.json).await?,
        Commands::Cities { ref query } => show_cities(query, cli.json)?,
        Commands::Prompt(ref args) => show_prompt(args, cli.json)?,
        Commands::Generate(ref args) => {
            let fonts = load_fonts(&cli);
            generate(args, fonts.as_ref(), cli.json).await?
        }
        Commands::Compose(ref args) => {
            let fonts = load_fonts(&cli);
            compose(args, fonts.as_ref(), cli.json)?
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "weather_canvas=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_fonts(cli: &Cli) -> Option<FontSet> {
    match FontSet::discover(cli.bold_font.as_deref(), cli.font.as_deref()) {
        Ok(fonts) => Some(fonts),
        Err(e) => {
            tracing::warn!(error = %e, "no overlay font, exports will be saved without text");
            None
        }
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn show_trends(json_output: bool) -> anyhow::Result<()> {
    let text = GeminiTextProvider::builder().build()?;
    let fetcher = WeatherFetcher::new(text);

    let mut trends = fetcher.trending_cities().await;
    let live = !trends.is_empty();
    if !live {
        trends = weather_canvas::weather::mock_trends();
    }

    if json_output {
        print_json(&serde_json::json!({ "live": live, "trends": trends }))?;
    } else {
        if !live {
            println!("Live trends unavailable, showing examples:\n");
        }
        for item in &trends {
            println!("  {} - {}", item.city, item.reason);
        }
    }
    Ok(())
}

async fn show_weather(city: &str, json_output: bool) -> anyhow::Result<()> {
    let text = GeminiTextProvider::builder().build()?;
    let fetcher = WeatherFetcher::new(text);
    let weather = fetcher.city_weather(city).await;

    if json_output {
        print_json(&serde_json::json!({ "city": city, "weather": weather }))?;
    } else {
        match weather {
            Some(w) => println!("{city}: {}°{}, {}", w.temperature, w.unit, w.condition),
            None => println!("{city}: no weather data available"),
        }
    }
    Ok(())
}

fn show_cities(query: &str, json_output: bool) -> anyhow::Result<()> {
    let hits = suggest_cities(query);
    if json_output {
        print_json(&hits)?;
    } else {
        for city in hits {
            println!("{city}");
        }
    }
    Ok(())
}

fn show_prompt(args: &StateArgs, json_output: bool) -> anyhow::Result<()> {
    let state = args.to_state();
    if !state.has_city() {
        anyhow::bail!("--city is required");
    }
    let prompt = weather_canvas::image_prompt(&state);
    if json_output {
        print_json(&serde_json::json!({ "state": state, "prompt": prompt }))?;
    } else {
        println!("{prompt}");
    }
    Ok(())
}

async fn generate(
    args: &GenerateArgs,
    fonts: Option<&FontSet>,
    json_output: bool,
) -> anyhow::Result<()> {
    let text = GeminiTextProvider::builder().build()?;
    let image = GeminiImageProvider::builder().build()?;

    let mut state = args.state.to_state();
    if args.here {
        state = state.with_city(PLACEHOLDER_LOCATION);
    }
    if !state.has_city() {
        anyhow::bail!("no city set: pass --city or --here");
    }

    let city = state.city.clone();
    let mut session = CanvasSession::with_state(text, image, state);
    if args.live {
        session.select_city(&city).await;
    }

    if session.generate().await?.is_none() {
        anyhow::bail!("the model returned no image for {city}");
    }

    if let (Some(path), Some(image)) = (&args.raw_output, session.image()) {
        image.save(path)?;
    }

    let export = session.export(&args.output, fonts)?;
    report_export(&export, session.state(), session.image(), json_output)
}

fn compose(args: &ComposeArgs, fonts: Option<&FontSet>, json_output: bool) -> anyhow::Result<()> {
    let state = args.state.to_state();
    if !state.has_city() {
        anyhow::bail!("--city is required");
    }

    let image = if args.image.starts_with("data:") {
        GeneratedImage::from_data_url(&args.image)?
    } else {
        GeneratedImage::from_bytes(std::fs::read(Path::new(&args.image))?)?
    };

    let export = compositor::export(
        &image.data,
        &state,
        fonts,
        &args.output,
        compositor::timestamp_ms(),
    )?;
    report_export(&export, &state, Some(&image), json_output)
}

fn report_export(
    export: &compositor::Export,
    state: &WeatherState,
    image: Option<&GeneratedImage>,
    json_output: bool,
) -> anyhow::Result<()> {
    if json_output {
        print_json(&serde_json::json!({
            "success": true,
            "output": export.path().display().to_string(),
            "composited": export.is_composited(),
            "state": state,
            "model": image.and_then(|i| i.metadata.model.clone()),
            "duration_ms": image.and_then(|i| i.metadata.duration_ms),
        }))?;
    } else {
        let kind = if export.is_composited() {
            "canvas"
        } else {
            "raw image (overlay failed)"
        };
        println!("Saved {kind}: {}", export.path().display());
        if let Some(duration) = image.and_then(|i| i.metadata.duration_ms) {
            println!("Generation time: {}ms", duration);
        }
    }
    Ok(())
}
