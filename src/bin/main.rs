use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{arg, value_parser, Command};
use lzfactor::{lz77, reconstruct, suffix_array, Factor, Factorizer, Mode, RabinKarp, SuffixArray};
use rayon::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

// "-" reads stdin
fn read_input(path: &str) -> io::Result<Vec<u8>> {
    if path == "-" {
        let mut buf = vec![];
        io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(path)
    }
}

fn output(path: Option<&String>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(File::create(p)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn write_factors(factors: &[Factor], out: &mut dyn Write) -> io::Result<()> {
    for f in factors {
        writeln!(out, "{}", f)?;
    }
    out.flush()
}

fn files_in(dir: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = vec![];
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<(), BoxError> {
    let matches = Command::new("lzfactor")
        .about("LZ factorization and suffix arrays over byte strings")
        .arg(arg!(-v --verbose ... "More logging (-v info, -vv debug)").global(true))
        .subcommand(
            Command::new("sa")
                .about("Print the suffix array, one `rank position` pair per line")
                .arg(arg!(<in> "input filename, - for stdin"))
                .arg(arg!(-l --lcp "also print the LCP with the previous suffix")),
        )
        .subcommand(
            Command::new("factorize")
                .alias("factorise")
                .about("Print the LZ factors of a file, one per line")
                .arg(arg!(<in> "input filename, - for stdin"))
                .arg(arg!(-o --output <out> "output filename (default: stdout)"))
                .arg(
                    arg!(-m --mode <MODE> "Which factors to emit")
                        .default_value("full")
                        .value_parser(["full", "refs"]),
                )
                .arg(arg!(-b --batch "treat <in> and <out> as directories, factorize every file in <in> to a file in <out>")),
        )
        .subcommand(
            Command::new("search")
                .about("Find a pattern with the suffix array")
                .arg(arg!(<in> "input filename, - for stdin"))
                .arg(arg!(<pattern> "bytes to look for"))
                .arg(arg!(-a --all "print every occurrence, not just the first")),
        )
        .subcommand(
            Command::new("lz77")
                .about("Print sliding-window LZ77 triples")
                .arg(arg!(<in> "input filename, - for stdin"))
                .arg(
                    arg!(-w --window <N> "window size in bytes")
                        .default_value("4096")
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("fingerprint")
                .about("Print the Rabin-Karp hash of every block-sized window")
                .arg(arg!(<in> "input filename, - for stdin"))
                .arg(
                    arg!(-b --block <N> "block size in bytes")
                        .default_value("16")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    arg!(-r --range <M> "hash modulus, ideally prime")
                        .default_value("16381")
                        .value_parser(value_parser!(u64)),
                ),
        )
        .subcommand(
            Command::new("bench")
                .about("Time SA-IS against divsufsort and check factorizations round-trip")
                .arg(arg!(<dir>))
                .arg(
                    arg!(-i --iters <iters>)
                        .default_value("1")
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand_required(true)
        .get_matches();

    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("sa", matches)) => {
            let inp = matches.get_one::<String>("in").unwrap();
            let data = read_input(inp)?;
            let sa = SuffixArray::new(&data)?;
            let mut out = output(None)?;
            if matches.get_flag("lcp") {
                for (rank, (pos, lcp)) in sa.as_slice().iter().zip(sa.lcp()).enumerate() {
                    writeln!(out, "{} {} {}", rank, pos, lcp)?;
                }
            } else {
                for (rank, pos) in sa.into_vec().into_iter().enumerate() {
                    writeln!(out, "{} {}", rank, pos)?;
                }
            }
            out.flush()?;
        }
        Some(("factorize", matches)) => {
            let inp = matches.get_one::<String>("in").unwrap();
            let out = matches.get_one::<String>("output");
            let mode = match matches.get_one::<String>("mode").map(|x| &**x) {
                Some("refs") => Mode::ReferencesOnly,
                _ => Mode::Full,
            };
            if matches.get_flag("batch") {
                let out = out.ok_or("--batch needs --output <dir>")?;
                files_in(inp)?
                    .par_iter()
                    .try_for_each(|path| -> Result<(), BoxError> {
                        let data = std::fs::read(path)?;
                        if data.is_empty() {
                            warn!(file = %path.display(), "skipping empty file");
                            return Ok(());
                        }
                        let factors = Factorizer::new(&data)?.factors(mode);
                        let name = path.file_name().ok_or("input path has no file name")?;
                        let target = Path::new(out).join(name);
                        let mut w = BufWriter::new(File::create(&target)?);
                        write_factors(&factors, &mut w)?;
                        info!(
                            file = %path.display(),
                            len = data.len(),
                            factors = factors.len(),
                            "factorized"
                        );
                        Ok(())
                    })?;
            } else {
                let data = read_input(inp)?;
                let factors = lzfactor::factorize(&data, mode)?;
                write_factors(&factors, &mut output(out)?)?;
            }
        }
        Some(("search", matches)) => {
            let inp = matches.get_one::<String>("in").unwrap();
            let pattern = matches.get_one::<String>("pattern").unwrap();
            let data = read_input(inp)?;
            let sa = SuffixArray::new(&data)?;
            let mut out = output(None)?;
            if matches.get_flag("all") {
                for pos in sa.search_all(pattern.as_bytes()) {
                    writeln!(out, "{}", pos)?;
                }
            } else {
                match sa.search(pattern.as_bytes()) {
                    Some(pos) => writeln!(out, "{}", pos)?,
                    None => writeln!(out, "-1")?,
                }
            }
            out.flush()?;
        }
        Some(("lz77", matches)) => {
            let inp = matches.get_one::<String>("in").unwrap();
            let window = *matches.get_one::<usize>("window").unwrap();
            let data = read_input(inp)?;
            let triples = lz77::encode(&data, window)?;
            let mut out = output(None)?;
            for t in &triples {
                writeln!(out, "{}", t)?;
            }
            out.flush()?;
        }
        Some(("fingerprint", matches)) => {
            let inp = matches.get_one::<String>("in").unwrap();
            let block = *matches.get_one::<usize>("block").unwrap();
            let range = *matches.get_one::<u64>("range").unwrap();
            let data = read_input(inp)?;
            let hashes = RabinKarp::new(block, range)?.hashes(&data)?;
            let mut out = output(None)?;
            for (pos, h) in hashes.iter().enumerate() {
                writeln!(out, "{} {}", pos, h)?;
            }
            out.flush()?;
        }
        Some(("bench", matches)) => {
            let iters = *matches.get_one::<usize>("iters").unwrap();
            let dir = matches.get_one::<String>("dir").unwrap();
            let files = files_in(dir)?;
            for iter in 0..iters {
                if iter > 0 {
                    println!("--- iteration {} ---", iter + 1);
                }
                for f in &files {
                    let inp = std::fs::read(f)?;
                    let fname = f.file_name().unwrap_or_default().to_string_lossy();
                    if inp.is_empty() || inp.len() > i32::MAX as usize {
                        warn!(file = %fname, len = inp.len(), "skipping");
                        continue;
                    }

                    let now = Instant::now();
                    let ours = suffix_array(&inp)?;
                    let sais_time = now.elapsed();

                    let now = Instant::now();
                    let mut theirs = vec![0i32; inp.len()];
                    divsufsort::sort_in_place(&inp, &mut theirs);
                    let divsufsort_time = now.elapsed();

                    if !ours.iter().zip(&theirs).all(|(&a, &b)| a == b as usize) {
                        return Err(format!("suffix array mismatch against divsufsort on {}", fname).into());
                    }

                    let now = Instant::now();
                    let factors = lzfactor::factorize(&inp, Mode::Full)?;
                    let factorize_time = now.elapsed();
                    if reconstruct(&factors)? != inp {
                        return Err(format!("factorization of {} does not reconstruct", fname).into());
                    }

                    println!(
                        "File {} len = {}, sa-is {:.2?}, divsufsort {:.2?}, factorize {:.2?} ({} factors)",
                        fname,
                        inp.len(),
                        sais_time,
                        divsufsort_time,
                        factorize_time,
                        factors.len()
                    );
                }
            }
        }
        _ => unreachable!(),
    }
    Ok(())
}
