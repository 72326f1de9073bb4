//! lcdglyph - Convert images into glyph text for LCD panels
//!
//! A command-line host for the lcd_glyph pipeline: it decodes image files,
//! converts them for a panel type and writes the resulting text block.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use lcd_glyph::{
    convert, resolve_grid, run_import, DisplayConfig, GlyphError, ImageDecoder, ImportOutcome,
    Notification, Notifier, Orientation, PixelBuffer, Selection, Selector, Surface,
    SurfaceProfile, TextBlock, WriteBackError,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lcdglyph")]
#[command(version)]
#[command(about = "Convert images into glyph text for LCD panels", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image to panel text
    Convert {
        /// Input image file (asked for on stdin when omitted)
        input: Option<PathBuf>,

        /// Output text file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        panel: PanelArgs,
    },

    /// Render what a panel would show to a PNG file
    Preview {
        /// Input image file
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Pixels per character cell in the preview
        #[arg(short, long, default_value = "1")]
        scale: u32,

        #[command(flatten)]
        panel: PanelArgs,
    },

    /// List panel types and their character grids
    Profiles,

    /// List accepted image file extensions
    Formats,
}

#[derive(Args)]
struct PanelArgs {
    /// Panel subtype, e.g. LargeLCDPanelWide (unknown names use the square grid)
    #[arg(short, long, default_value = "Default")]
    profile: SurfaceProfile,

    /// Panel rotation in quarter turns
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    #[arg(conflicts_with = "degrees")]
    rotation: i32,

    /// Panel rotation in degrees
    #[arg(short, long)]
    degrees: Option<f32>,
}

impl PanelArgs {
    fn orientation(&self) -> Orientation {
        match self.degrees {
            Some(degrees) => Orientation::from_degrees(degrees),
            None => Orientation::from_steps(self.rotation),
        }
    }
}

/// Uses the path from the command line, or asks for one on stdin.
/// An empty answer cancels.
struct PathSelector {
    input: Option<PathBuf>,
}

impl Selector for PathSelector {
    fn select(&mut self) -> Selection {
        if let Some(path) = self.input.take() {
            return Selection::Chosen(path);
        }

        eprint!("Image file: ");
        let _ = io::stderr().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) if !line.trim().is_empty() => Selection::Chosen(PathBuf::from(line.trim())),
            _ => Selection::Cancelled,
        }
    }
}

struct FileDecoder;

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> lcd_glyph::Result<PixelBuffer> {
        let img = image::open(path)
            .map_err(|e| GlyphError::Decode(format!("{}: {e}", path.display())))?;
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();
        PixelBuffer::from_rgb8(width as usize, height as usize, rgb_img.as_raw())
    }
}

/// Writes text blocks to a file or stdout.
struct TextSink {
    profile: SurfaceProfile,
    orientation: Orientation,
    output: Option<PathBuf>,
}

impl Surface for TextSink {
    fn profile(&self) -> SurfaceProfile {
        self.profile
    }

    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn is_alive(&self) -> bool {
        match self.output.as_deref().and_then(Path::parent) {
            Some(dir) if !dir.as_os_str().is_empty() => dir.is_dir(),
            _ => true,
        }
    }

    fn apply(
        &mut self,
        text: &TextBlock,
        config: &DisplayConfig,
    ) -> Result<(), WriteBackError> {
        tracing::info!(
            font = config.font,
            font_size = config.font_size,
            content_mode = ?config.content_mode,
            padding = config.text_padding,
            "panel settings"
        );
        let written = match &self.output {
            Some(path) => fs::write(path, text.as_str()),
            None => io::stdout().lock().write_all(text.as_str().as_bytes()),
        };
        written.map_err(|e| WriteBackError::Rejected(e.to_string()))
    }
}

struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notification: Notification) {
        tracing::error!(
            kind = %notification.kind,
            duration_ms = notification.duration.as_millis() as u64,
            "{}",
            notification.message()
        );
    }
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(io::stderr),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            panel,
        } => {
            let mut selector = PathSelector { input };
            let mut sink = TextSink {
                profile: panel.profile,
                orientation: panel.orientation(),
                output,
            };

            match run_import(&mut selector, &FileDecoder, &mut sink, &StderrNotifier) {
                ImportOutcome::Cancelled => tracing::info!("cancelled"),
                ImportOutcome::Applied(grid) => {
                    if let Some(path) = &sink.output {
                        tracing::info!(%grid, path = %path.display(), "written");
                    }
                }
                ImportOutcome::Failed(_) => return Ok(ExitCode::FAILURE),
            }
        }

        Commands::Preview {
            input,
            output,
            scale,
            panel,
        } => {
            let image = FileDecoder.decode(&input)?;
            let conversion = convert(image, panel.profile, panel.orientation())?;
            let preview = conversion.text.to_pixels();
            let (width, height) = preview.dimensions();

            let mut img = image::RgbImage::from_raw(width as u32, height as u32, preview.to_rgb8())
                .ok_or_else(|| anyhow::anyhow!("preview buffer does not match {width}x{height}"))?;
            let scale = scale.max(1);
            if scale > 1 {
                img = image::imageops::resize(
                    &img,
                    width as u32 * scale,
                    height as u32 * scale,
                    image::imageops::FilterType::Nearest,
                );
            }
            img.save(&output)?;

            tracing::info!(
                grid = %conversion.grid,
                path = %output.display(),
                "preview written"
            );
        }

        Commands::Profiles => {
            for profile in SurfaceProfile::ALL {
                println!("{:<20} {}", profile.name(), resolve_grid(profile, Orientation::NONE));
            }
        }

        Commands::Formats => {
            let mut extensions: Vec<&str> = image::ImageFormat::all()
                .filter(|format| format.reading_enabled())
                .flat_map(|format| format.extensions_str().iter().copied())
                .collect();
            extensions.sort_unstable();
            extensions.dedup();
            println!("{}", extensions.join(";"));
        }
    }

    Ok(ExitCode::SUCCESS)
}
