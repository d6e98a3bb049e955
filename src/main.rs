use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use invoice_pdf::{
    Brand, Error, GroupedCurrency, InvoiceRenderer, InvoiceSnapshot, Logo, Theme,
    invoice_file_name,
};

/// Render an invoice snapshot (JSON) to a paginated A4 PDF.
#[derive(Parser, Debug)]
#[command(name = "invoice-pdf", version, about)]
struct Args {
    /// Invoice snapshot JSON files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for the generated invoice_<number>.pdf files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Currency format locale (en-IN, en-US, en-GB, de-DE)
    #[arg(short, long, default_value = "en-IN")]
    locale: String,

    /// Brand name printed in the header
    #[arg(long)]
    brand: Option<String>,

    /// Line printed under the brand name
    #[arg(long)]
    tagline: Option<String>,

    /// PNG logo for the header
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Logo height in millimetres (width follows the image aspect ratio)
    #[arg(long, default_value_t = 16.0)]
    logo_height: f32,
}

fn load_logo(path: &Path, height: f32) -> Result<Logo, Error> {
    let png = std::fs::read(path).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
    })?;
    let width = match image::ImageReader::with_format(
        std::io::BufReader::new(std::io::Cursor::new(&png)),
        image::ImageFormat::Png,
    )
    .into_dimensions()
    {
        Ok((w, h)) if h > 0 => height * w as f32 / h as f32,
        _ => height,
    };
    Ok(Logo { png, width, height })
}

fn run(args: &Args) -> Result<(), Error> {
    let money = GroupedCurrency::for_locale(&args.locale).unwrap_or_else(|| {
        log::warn!("Unknown locale {}, falling back to en-IN", args.locale);
        GroupedCurrency::inr()
    });

    let mut brand = Brand::default();
    if let Some(name) = &args.brand {
        brand.name = name.clone();
    }
    if let Some(tagline) = &args.tagline {
        brand.tagline = tagline.clone();
    }
    if let Some(path) = &args.logo {
        brand.logo = Some(load_logo(path, args.logo_height)?);
    }

    let renderer = InvoiceRenderer::new(Theme::default(), brand, money);
    std::fs::create_dir_all(&args.out_dir)?;

    for input in &args.inputs {
        let json = std::fs::read_to_string(input).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, input.display())))
        })?;
        let invoice = InvoiceSnapshot::from_json(&json)?;
        let bytes = renderer.render(&invoice)?;
        let output = args.out_dir.join(invoice_file_name(&invoice));
        std::fs::write(&output, &bytes)?;
        println!("{} -> {}", input.display(), output.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
