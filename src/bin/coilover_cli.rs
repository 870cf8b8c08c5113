#[cfg(target_arch = "wasm32")]
fn main() {
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("coilover_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use coilover_engine::Engine;
    use coilover_engine::assembly::{DEFAULT_CURVE_SAMPLES, DimensionSet, HelperPlacement, HelperSpringSpec, PartMesh};
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const USAGE: &str = r#"coilover_cli (coilover-engine)

USAGE:
  coilover_cli readout [options]
  coilover_cli curve [options] [--samples <n>]
  coilover_cli export --out-dir <dir> [options] [--overwrite]

OPTIONS:
  --travel <percent>      Shaft travel in percent of the usable stroke (default 0)
  --helper <above|below>  Add the default helper spring on the given side
  --samples <n>           Force curve samples (default 150)
  --out-dir <dir>         Directory for <part>.obj files
  --overwrite             Overwrite existing output files
  -h, --help              Show this help
"#;

    #[derive(Debug, Default)]
    struct Options {
        travel: f64,
        helper: Option<HelperPlacement>,
        samples: Option<usize>,
        out_dir: Option<PathBuf>,
        overwrite: bool,
        help: bool,
    }

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };
        if matches!(command.as_str(), "-h" | "--help" | "help") {
            print_usage();
            return Ok(());
        }

        let options = parse_options(&mut args)?;
        if options.help {
            print_usage();
            return Ok(());
        }
        let engine = build_engine(&options)?;

        match command.as_str() {
            "readout" => cmd_readout(&engine),
            "curve" => cmd_curve(&engine, options.samples.unwrap_or(DEFAULT_CURVE_SAMPLES)),
            "export" => cmd_export(engine, &options),
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn parse_options(args: &mut Args) -> Result<Options, String> {
        let mut options = Options::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--travel" => options.travel = parse_number("--travel", &args.value("--travel")?)?,
                "--helper" => {
                    options.helper = Some(match args.value("--helper")?.as_str() {
                        "above" => HelperPlacement::Above,
                        "below" => HelperPlacement::Below,
                        other => return Err(format!("--helper expects `above` or `below`, got `{other}`")),
                    });
                }
                "--samples" => {
                    let raw = args.value("--samples")?;
                    let samples = raw
                        .parse::<usize>()
                        .map_err(|e| format!("--samples expects a whole number, got `{raw}`: {e}"))?;
                    options.samples = Some(samples);
                }
                "--out-dir" => options.out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--overwrite" => options.overwrite = true,
                "-h" | "--help" => options.help = true,
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }
        Ok(options)
    }

    fn parse_number(flag: &str, raw: &str) -> Result<f64, String> {
        let value = raw
            .parse::<f64>()
            .map_err(|e| format!("{flag} expects a number, got `{raw}`: {e}"))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("{flag} must be finite"))
        }
    }

    fn build_engine(options: &Options) -> Result<Engine, String> {
        let mut dims = DimensionSet::default();
        if let Some(placement) = options.helper {
            dims.helper = Some(HelperSpringSpec {
                placement,
                ..HelperSpringSpec::default()
            });
        }

        let mut engine = Engine::new();
        engine.apply_dimensions(dims).map_err(|e| e.to_string())?;
        engine.travel_percent(options.travel);
        Ok(engine)
    }

    fn cmd_readout(engine: &Engine) -> Result<(), String> {
        let r = engine.readout().map_err(|e| e.to_string())?;

        println!("travel            {:>10.2} %  ({:.2} mm)", r.travel_percent, r.travel);
        println!(
            "strut length      {:>10.2} mm (range {:.2} .. {:.2})",
            r.strut_length, r.strut_length_min, r.strut_length_max
        );
        println!("available length  {:>10.2} mm", r.available_length);
        println!("main spring       {:>10.2} mm  ({:.3} active coils)", r.main_length, r.main_active_coils);
        if let (Some(length), Some(coils)) = (r.helper_length, r.helper_active_coils) {
            println!("helper spring     {length:>10.2} mm  ({coils:.3} active coils)");
        }
        println!("force             {:>10.2} N", r.force);
        println!("state             {:>10}", r.state_label);
        Ok(())
    }

    fn cmd_curve(engine: &Engine, samples: usize) -> Result<(), String> {
        let curve = engine.force_curve(samples).map_err(|e| e.to_string())?;
        let stdout = std::io::stdout();
        let mut w = BufWriter::new(stdout.lock());

        writeln!(w, "travel_mm,force_n").map_err(|e| format!("write csv: {e}"))?;
        for point in &curve {
            writeln!(w, "{:.4},{:.4}", point.travel, point.force).map_err(|e| format!("write csv: {e}"))?;
        }
        w.flush().map_err(|e| format!("flush csv: {e}"))
    }

    fn cmd_export(mut engine: Engine, options: &Options) -> Result<(), String> {
        let dir = options.out_dir.as_deref().ok_or("export requires --out-dir")?;
        fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

        engine.evaluate_snapshot().map_err(|e| e.to_string())?;
        let snapshot = engine.snapshot().ok_or("no snapshot after evaluation")?;

        for part in &snapshot.parts {
            let path = dir.join(format!("{}.obj", part.kind.id()));
            write_obj_file(&path, part, options.overwrite)?;
            eprintln!(
                "wrote {}: vertices={} triangles={} | {}",
                path.display(),
                part.mesh.vertex_count(),
                part.mesh.triangle_count(),
                part.diagnostics.summary()
            );
        }
        Ok(())
    }

    fn write_obj_file(path: &Path, part: &PartMesh, overwrite: bool) -> Result<(), String> {
        let mesh = &part.mesh;
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;

        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "# coilover-engine coilover_cli").map_err(|e| format!("write obj: {e}"))?;
        let [r, g, b] = part.color;
        writeln!(w, "# color {r} {g} {b}").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "o {}", part.kind.id()).map_err(|e| format!("write obj: {e}"))?;

        for p in mesh.positions.iter().copied() {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(|e| format!("write obj: {e}"))?;
        }

        if let Some(normals) = mesh.normals.as_ref() {
            for n in normals.iter().copied() {
                writeln!(w, "vn {} {} {}", n[0], n[1], n[2]).map_err(|e| format!("write obj: {e}"))?;
            }
        }

        let has_normals = mesh.normals.is_some();
        for tri in mesh.indices.chunks_exact(3) {
            let a = tri[0] + 1;
            let b = tri[1] + 1;
            let c = tri[2] + 1;

            if has_normals {
                writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")
            } else {
                writeln!(w, "f {a} {b} {c}")
            }
            .map_err(|e| format!("write obj: {e}"))?;
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }
}
