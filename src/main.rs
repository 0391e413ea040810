use anyhow::{bail, Context, Result};
use clap::{Arg, Command};
use log::info;
use m7err::geometry::Geometry;
use m7err::projection::{Precision, Variant};
use m7err::rng::*;
use m7err::{analyze, Config};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arg_matches = cli().get_matches();

    let (width, height) = parse_resolution(arg_matches.value_of("resolution"))
        .context("invalid resolution")?;
    if height < 3 || width == 0 {
        bail!("resolution {}x{} leaves no ground scanlines", width, height);
    }
    let depth: f64 = parse_arg(arg_matches.value_of("depth")).context("invalid depth")?;
    let extra_bits: u32 =
        parse_arg(arg_matches.value_of("extra-bits")).context("invalid extra bit count")?;
    let samples: usize =
        parse_arg(arg_matches.value_of("samples")).context("invalid sample count")?;
    let rng: RttRng = if arg_matches.is_present("random") {
        RttRng::from_entropy()
    } else {
        RttRng::seed_from_u64(parse_arg(arg_matches.value_of("seed")).context("invalid rng seed")?)
    };
    let error_map = match arg_matches.value_of("error-map") {
        Some(path) => {
            let variant = match arg_matches.value_of("variant") {
                Some(name) => name.parse()?,
                None => Variant::default(),
            };
            Some((PathBuf::from(path), variant))
        }
        None => None,
    };
    let chart = arg_matches
        .value_of("output")
        .map(PathBuf::from)
        .context("missing chart path")?;

    let config = Config {
        geometry: Geometry {
            width,
            height,
            depth,
            ..Geometry::default()
        },
        precision: Precision::GBA.with_extra_bits(extra_bits)?,
        chart,
        residuals: arg_matches.is_present("residuals"),
        samples,
        error_map,
    };

    info!(
        "Comparing {} x {} screen, z = {}, {}.",
        width, height, depth, config.precision
    );

    print!("{}", analyze(&config, &rng)?);
    Ok(())
}

fn cli() -> Command<'static> {
    Command::new("m7err")
        .version("0.1.0")
        .author("Jean-Francois Roy <jf@devklog.net>")
        .about("Mode 7 fixed-point texture coordinate error")
        .arg(
            Arg::new("resolution")
                .long("resolution")
                .short('r')
                .takes_value(true)
                .default_value("240x160")
                .help("screen resolution in pixels"),
        )
        .arg(
            Arg::new("depth")
                .long("depth")
                .short('z')
                .takes_value(true)
                .default_value("1.5")
                .help("camera height"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .takes_value(true)
                .default_value("scanline_x.svg")
                .help("chart path, .svg or .png"),
        )
        .arg(
            Arg::new("residuals")
                .long("residuals")
                .help("plot fixed-point minus reference instead of texel x"),
        )
        .arg(
            Arg::new("extra-bits")
                .long("extra-bits")
                .short('b')
                .takes_value(true)
                .default_value("0")
                .help("fractional bits added to every register"),
        )
        .arg(
            Arg::new("samples")
                .long("samples")
                .short('s')
                .takes_value(true)
                .default_value("64")
                .help("random samples per scanline"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .short('e')
                .takes_value(true)
                .default_value("0")
                .help("rng seed"),
        )
        .arg(
            Arg::new("random")
                .long("random")
                .short('m')
                .help("use a random rng seed"),
        )
        .arg(
            Arg::new("error-map")
                .long("error-map")
                .takes_value(true)
                .help("write a per-pixel error image"),
        )
        .arg(
            Arg::new("variant")
                .long("variant")
                .takes_value(true)
                .requires("error-map")
                .possible_values(["truncated", "rounded-step", "rounded"])
                .help("variant shown in the error map [default: rounded]"),
        )
}

fn parse_resolution(s: Option<&str>) -> Option<(u32, u32)> {
    let v: Vec<&str> = s?.split('x').collect();
    if v.len() != 2 {
        return None;
    }
    let w = v[0].parse::<u32>().ok()?;
    let h = v[1].parse::<u32>().ok()?;
    Some((w, h))
}

fn parse_arg<T: std::str::FromStr>(s: Option<&str>) -> Option<T> {
    s?.parse::<T>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_needs_an_error_map() {
        assert!(cli().try_get_matches_from(["m7err", "--variant", "truncated"]).is_err());
        let m = cli()
            .try_get_matches_from(["m7err", "--error-map", "e.png", "--variant", "truncated"])
            .unwrap();
        assert_eq!(m.value_of("variant"), Some("truncated"));
    }

    #[test]
    fn variant_is_optional_with_error_map() {
        let m = cli().try_get_matches_from(["m7err", "--error-map", "e.png"]).unwrap();
        assert_eq!(m.value_of("variant"), None);
        assert_eq!(m.value_of("output"), Some("scanline_x.svg"));
    }

    #[test]
    fn resolution_parses() {
        assert_eq!(parse_resolution(Some("240x160")), Some((240, 160)));
        assert_eq!(parse_resolution(Some("240")), None);
        assert_eq!(parse_resolution(Some("ax1")), None);
    }
}
