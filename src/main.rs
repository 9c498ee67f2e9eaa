//! # Iconforge CLI
//!
//! Usage:
//!   iconforge icons.json -o icons.ttf
//!   cat icons.json | iconforge -o icons.ttf
//!   iconforge --example > icons.json
//!
//! Icons with a `path` are read relative to the manifest's directory
//! (the working directory when reading stdin). Set `RUST_LOG=iconforge=debug`
//! for per-glyph statistics.

use iconforge::Manifest;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_manifest_json());
        return;
    }

    // Read input
    let (input, base_dir) = if args.len() > 1 && !args[1].starts_with('-') {
        let path = PathBuf::from(&args[1]);
        let input = fs::read_to_string(&path)
            .unwrap_or_else(|e| fail(&format!("Failed to read {}: {}", path.display(), e)));
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        (input, base)
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            fail(&format!("Failed to read stdin: {}", e));
        }
        (buf, PathBuf::new())
    };

    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "icons.ttf".to_string());

    let mut manifest =
        Manifest::from_json(&input).unwrap_or_else(|e| fail(&format!("Invalid manifest: {}", e)));

    for icon in &mut manifest.icons {
        if icon.svg.is_some() {
            continue;
        }
        if let Some(rel) = &icon.path {
            let file = base_dir.join(rel);
            let svg = fs::read_to_string(&file)
                .unwrap_or_else(|e| fail(&format!("Failed to read {}: {}", file.display(), e)));
            icon.svg = Some(svg);
        }
    }

    match manifest.build() {
        Ok(build) => {
            if let Err(e) = fs::write(&output_path, &build.ttf) {
                fail(&format!("Failed to write {}: {}", output_path, e));
            }
            eprintln!(
                "✓ Written {} glyphs ({} bytes) to {}",
                build.glyphs.len(),
                build.ttf.len(),
                output_path
            );
            for glyph in &build.glyphs {
                eprintln!("  U+{:04X}  {}", glyph.codepoint, glyph.name);
            }
        }
        Err(e) => fail(&format!("Failed to build font: {}", e)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("✗ {}", message);
    process::exit(1);
}

fn example_manifest_json() -> &'static str {
    r##"{
  "config": {
    "fontName": "example-icons",
    "description": "Example icon font",
    "url": "https://example.com",
    "unitsPerEm": 512,
    "descent": -64,
    "tuning": {
      "star": { "size": 1.1, "y": -0.02 }
    }
  },
  "icons": [
    {
      "name": "home",
      "svg": "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 24 24\"><path d=\"M12 3 2 12h3v8h5v-6h4v6h5v-8h3z\"/></svg>"
    },
    {
      "name": "circle",
      "svg": "<svg viewBox=\"0 0 24 24\"><circle cx=\"12\" cy=\"12\" r=\"10\"/></svg>"
    },
    {
      "name": "star",
      "svg": "<svg viewBox=\"0 0 24 24\"><polygon points=\"12,2 15,9 22,9 16.5,14 18.5,21 12,17 5.5,21 7.5,14 2,9 9,9\"/></svg>"
    },
    {
      "name": "square",
      "svg": "<svg width=\"16\" height=\"16\"><rect x=\"2\" y=\"2\" width=\"12\" height=\"12\" rx=\"2\"/></svg>",
      "tuning": { "size": "cover" }
    }
  ]
}
"##
}
