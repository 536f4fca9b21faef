//! CLI tool for converting lecture notes and PDF slides into an Anki deck.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use image::DynamicImage;
use slides_core::{Card, DeckFormatter, NotesParser, ParsedNotes, Separator};
use slides_render::{PageRenderer, PdfRenderer, DEFAULT_WIDTH};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Convert text notes and PDF slides into an Anki deck.
#[derive(Parser, Debug)]
#[command(name = "slides2anki")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The notes for the lecture
    notes: PathBuf,

    /// The PDF slides for the same lecture
    slides: PathBuf,

    /// The file to write the deck to
    deck: PathBuf,

    /// The Anki profile folder; images go to its collection.media folder
    #[arg(short = 'U', long)]
    anki: Option<PathBuf>,

    /// Folder to write images to (default: the deck's folder)
    #[arg(short, long, conflicts_with = "anki")]
    media_dir: Option<PathBuf>,

    /// Prefix for image file names; must be unique (default: slides file name)
    #[arg(short = 'P', long)]
    prefix: Option<String>,

    /// Overwrite existing image files
    #[arg(short, long)]
    force: bool,

    /// Width of rendered images in pixels
    #[arg(short, long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Separator between lines written for the same slide
    #[arg(short, long, value_enum, default_value_t = SeparatorArg::Html)]
    separator: SeparatorArg,

    /// Print the parsed notes as JSON and exit
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SeparatorArg {
    /// `<br />`
    Html,
    /// Plain newline
    Newline,
}

impl From<SeparatorArg> for Separator {
    fn from(arg: SeparatorArg) -> Self {
        match arg {
            SeparatorArg::Html => Separator::HtmlBreak,
            SeparatorArg::Newline => Separator::Newline,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let notes_path = expand_home(&args.notes);
    let notes = read_notes(&notes_path, args.separator.into())?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
        return Ok(());
    }

    if args.verbose {
        eprintln!("Verifying arguments ...");
    }
    let media_dir = resolve_media_dir(&args)?;

    if args.verbose {
        eprintln!("Reading slides ...");
    }
    let slides_path = expand_home(&args.slides);
    let renderer = PdfRenderer::open(&slides_path)
        .with_context(|| format!("Error while reading {}", slides_path.display()))?
        .with_width(args.width);

    let prefix = match &args.prefix {
        Some(prefix) => prefix.clone(),
        None => slides_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("slides")
            .to_string(),
    };
    let formatter = DeckFormatter::new(prefix);
    let cards = formatter.cards(&notes);

    verify_outputs(&cards, &renderer, &media_dir, args.force)?;

    if args.verbose {
        eprintln!("Rendering slides ...");
    }
    let images = render_media(&cards, &renderer, &media_dir)?;

    // Potentially destructive changes beyond this point
    if args.verbose {
        eprintln!("Starting extraction ...");
    }

    for (path, image) in &images {
        image
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::debug!("Wrote {}", path.display());
    }

    let deck_path = expand_home(&args.deck);
    write_output(&deck_path, &formatter.format(&cards))?;

    if args.verbose {
        eprintln!(
            "Written {} cards to {} and {} images to {}",
            cards.len(),
            deck_path.display(),
            images.len(),
            media_dir.display()
        );
    }

    Ok(())
}

/// Read and parse the notes file.
fn read_notes(path: &Path, separator: Separator) -> Result<ParsedNotes> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let notes = NotesParser::new()
        .with_separator(separator)
        .parse_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    for warning in &notes.warnings {
        eprintln!("Warning: {}", warning);
    }

    Ok(notes)
}

/// Determine the folder images are written to.
fn resolve_media_dir(args: &Args) -> Result<PathBuf> {
    if let Some(anki) = &args.anki {
        let anki = expand_home(anki);
        if !anki.is_dir() {
            bail!("Folder: {} does not exist.", anki.display());
        }

        let media = anki.join("collection.media");
        if !media.is_dir() {
            bail!(
                "Folder: {} does not exist. Is \"{}\" the path to a user profile?",
                media.display(),
                anki.display()
            );
        }
        return Ok(media);
    }

    if let Some(dir) = &args.media_dir {
        let dir = expand_home(dir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create media directory: {}", dir.display()))?;
        return Ok(dir);
    }

    let deck = expand_home(&args.deck);
    Ok(match deck.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    })
}

/// Check every page an image is rendered from exists and no image would be
/// overwritten unless `force` is set.
fn verify_outputs(
    cards: &[Card],
    renderer: &impl PageRenderer,
    media_dir: &Path,
    force: bool,
) -> Result<()> {
    for request in cards.iter().flat_map(|card| &card.media) {
        renderer
            .check_page(request.slide)
            .with_context(|| format!("Slide {} has no page in the PDF", request.slide))?;

        let path = media_dir.join(&request.file_name);
        if !force && path.exists() {
            bail!(
                "File \"{}\" already exists. Choose a different prefix (using --prefix) or use -f to overwrite the files.",
                path.display()
            );
        }
    }

    Ok(())
}

/// Render every image the cards need, paired with its destination path.
/// Nothing is written, so a failed render leaves the media folder untouched.
fn render_media(
    cards: &[Card],
    renderer: &impl PageRenderer,
    media_dir: &Path,
) -> Result<Vec<(PathBuf, DynamicImage)>> {
    cards
        .iter()
        .flat_map(|card| &card.media)
        .map(|request| {
            let image = renderer
                .render_cropped_page(request.slide, &request.crop)
                .with_context(|| format!("Failed to render slide {}", request.slide))?;
            Ok((media_dir.join(&request.file_name), image))
        })
        .collect()
}

/// Expand a leading `~` to the home directory.
fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
