use std::process::ExitCode;

use nativefiledialog::logger::{LOG_LEVEL_ALL, set_log_level};
use nativefiledialog::{CommonFilter, DialogConfig, FileFilter, NativeFileDialog};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Dir,
    File,
    Files,
    Save,
}

/// Parse command line arguments
fn parse_cli_args(args: &[String]) -> Result<(Mode, DialogConfig), String> {
    let mut mode = Mode::File;
    let mut config = DialogConfig::new();

    let mut i = 1; // Skip executable name
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--mode", Some(v)) => {
                mode = match v.to_lowercase().as_str() {
                    "dir" | "folder" => Mode::Dir,
                    "file" => Mode::File,
                    "files" => Mode::Files,
                    "save" => Mode::Save,
                    other => return Err(format!("unknown mode '{}'", other)),
                };
                i += 2;
            }
            ("--title", Some(v)) => {
                config = config.title(v.as_str());
                i += 2;
            }
            ("--dir", Some(v)) => {
                config = config.init_dir(v);
                i += 2;
            }
            ("--file", Some(v)) => {
                config = config.init_file(v.as_str());
                i += 2;
            }
            // --filter Images=png,jpg  or  --filter flac (a built-in filter name)
            ("--filter", Some(v)) => {
                let filter = match v.split_once('=') {
                    Some((label, exts)) => FileFilter::new(label, exts.split(',')),
                    None => CommonFilter::from_name(v)
                        .map(FileFilter::from)
                        .ok_or_else(|| format!("unknown filter '{}'", v))?,
                };
                config = config.filter(filter);
                i += 2;
            }
            ("--verbose", _) => {
                set_log_level(LOG_LEVEL_ALL);
                i += 1;
            }
            (flag, _) => return Err(format!("unexpected argument '{}'", flag)),
        }
    }

    Ok((mode, config))
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let (mode, config) = match parse_cli_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("usage: nfd-demo [--mode dir|file|files|save] [--title T] [--dir D] [--file F] [--filter LABEL=ext,ext]... [--verbose]");
            return ExitCode::from(2);
        }
    };

    let nfd = match NativeFileDialog::new() {
        Ok(nfd) => nfd,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match mode {
        Mode::Dir => nfd.get_dir(config).map(|p| p.into_iter().collect::<Vec<_>>()),
        Mode::File => nfd.get_file(config).map(|p| p.into_iter().collect()),
        Mode::Files => nfd.get_files(config).map(Option::unwrap_or_default),
        Mode::Save => nfd.set_file(config).map(|p| p.into_iter().collect()),
    };

    match result {
        Ok(paths) if paths.is_empty() => {
            eprintln!("cancelled");
            ExitCode::from(1)
        }
        Ok(paths) => {
            for p in paths {
                println!("{}", p.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
