use std::str::FromStr;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use rpbmp390::compensate::{self, meters_to_feet};
use rpbmp390::invert::invert_readings;
use rpbmp390::sensor::{Bmp390, ADDR_BMP390};
use rpbmp390::{
    calib, CalibrationCoefficients, CompensatedReading, InversionConfig, InversionReport,
    RawReading, SearchBounds,
};

#[derive(Parser)]
#[command(name = "rpbmp390", about = "BMP390 compensation and reverse calculation")]
struct Cli {
    /// Calibration NVM block as 42 hex digits (defaults to the reference sensor)
    #[arg(long, global = true)]
    calib: Option<String>,

    /// Temperature tolerance for reverse calculation, in °C
    #[arg(long, global = true, default_value_t = 0.01)]
    temp_tolerance: f64,

    /// Pressure tolerance for reverse calculation, in Pa
    #[arg(long, global = true, default_value_t = 10.0)]
    press_tolerance: f64,

    /// ADC width bounding the reverse search
    #[arg(long, global = true, default_value_t = 24)]
    adc_bits: u8,

    /// BMP390 I2C slave address
    #[arg(long, global = true, default_value_t = ADDR_BMP390)]
    address: u16,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compensate a raw ADC pair
    Compensate { raw_temp: u32, raw_press: u32 },
    /// Find raw ADC values producing each TEMP_C:PRESS_PA target
    Invert {
        #[arg(required = true, allow_hyphen_values = true)]
        targets: Vec<Target>,
    },
    /// Print the quantized calibration coefficients
    Calib,
    /// Read calibration and one sample from the sensor
    Read,
}

/// A `temp_c:press_pa` pair, e.g. `23.45:98273.95`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Target {
    temp_c: f64,
    press_pa: f64,
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (temp, press) = s
            .split_once(':')
            .ok_or_else(|| format!("expected TEMP_C:PRESS_PA, got {:?}", s))?;
        let temp_c = temp
            .trim()
            .parse()
            .map_err(|e| format!("bad temperature {:?}: {}", temp, e))?;
        let press_pa = press
            .trim()
            .parse()
            .map_err(|e| format!("bad pressure {:?}: {}", press, e))?;
        Ok(Target { temp_c, press_pa })
    }
}

fn parse_hex(s: &str) -> anyhow::Result<Vec<u8>> {
    let s = s.trim();
    if s.len() % 2 != 0 {
        bail!("calibration hex has odd length {}", s.len());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            let pair = s.get(i..i + 2).context("calibration hex is not ASCII")?;
            u8::from_str_radix(pair, 16)
                .with_context(|| format!("invalid hex byte {:?}", pair))
        })
        .collect()
}

fn load_calib(cli: &Cli) -> anyhow::Result<CalibrationCoefficients> {
    let calib = match &cli.calib {
        Some(hex) => calib::parse(&parse_hex(hex)?).context("bad --calib block")?,
        None => calib::parse(&calib::REFERENCE_NVM)?,
    };
    Ok(calib)
}

fn print_calib(calib: &CalibrationCoefficients) {
    println!("Quantized calibration coefficients:");
    let fields = [
        ("t1", calib.t1),
        ("t2", calib.t2),
        ("t3", calib.t3),
        ("p1", calib.p1),
        ("p2", calib.p2),
        ("p3", calib.p3),
        ("p4", calib.p4),
        ("p5", calib.p5),
        ("p6", calib.p6),
        ("p7", calib.p7),
        ("p8", calib.p8),
        ("p9", calib.p9),
        ("p10", calib.p10),
        ("p11", calib.p11),
    ];
    for (name, value) in fields.iter() {
        println!("  {:<4} {:.10e}", name, value);
    }
}

fn format_reading(raw: RawReading, reading: &CompensatedReading) -> String {
    let altitude = match compensate::altitude(reading.pressure_pa) {
        Ok(m) => format!("Altitude: {:.2} m ({:.2} ft)", m, meters_to_feet(m)),
        Err(e) => format!("Altitude: n/a ({})", e),
    };
    [
        format!("Raw ADC: temperature {}, pressure {}", raw.temperature, raw.pressure),
        format!(
            "Temperature: {:.2} C ({:.2} F)",
            reading.temperature_c,
            reading.temperature_f()
        ),
        format!(
            "Pressure: {:.2} Pa ({:.2} hPa)",
            reading.pressure_pa,
            reading.pressure_hpa()
        ),
        altitude,
    ]
    .join("\n")
}

fn format_report(report: &InversionReport) -> String {
    [
        format!(
            "Target: {:.2} C, {:.2} Pa",
            report.temperature.target, report.pressure.target
        ),
        format!(
            "Temperature ADC: {} (0x{:06X})",
            report.raw.temperature, report.raw.temperature
        ),
        format!(
            "Pressure ADC: {} (0x{:06X})",
            report.raw.pressure, report.raw.pressure
        ),
        format!(
            "Achieved temperature: {:.2} C (error: {:.4} C)",
            report.temperature.achieved, report.temperature.absolute_error
        ),
        format!(
            "Achieved pressure: {:.2} Pa (error: {:.2} Pa)",
            report.pressure.achieved, report.pressure.absolute_error
        ),
    ]
    .join("\n")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .parse_default_env()
        .init();

    match &cli.command {
        Command::Compensate {
            raw_temp,
            raw_press,
        } => {
            let calib = load_calib(&cli)?;
            let raw = RawReading {
                temperature: *raw_temp,
                pressure: *raw_press,
            };
            println!("{}", format_reading(raw, &compensate::compensate(raw, &calib)));
        }
        Command::Invert { targets } => {
            let calib = load_calib(&cli)?;
            let bounds = SearchBounds::for_bits(cli.adc_bits)?;
            let config = InversionConfig::new(cli.temp_tolerance, cli.press_tolerance, bounds)?;
            let pairs: Vec<(f64, f64)> = targets.iter().map(|t| (t.temp_c, t.press_pa)).collect();

            for (i, report) in invert_readings(&pairs, &calib, &config).iter().enumerate() {
                println!("--- {}/{} ---", i + 1, pairs.len());
                println!("{}", format_report(report));
            }
        }
        Command::Calib => {
            print_calib(&load_calib(&cli)?);
        }
        Command::Read => {
            let sensor = Bmp390::new(cli.address).context("BMP390 bring-up failed")?;
            let calib = sensor.read_calib()?;
            let raw = sensor.read_raw()?;
            println!("{}", format_reading(raw, &compensate::compensate(raw, &calib)));
        }
    }

    Ok(())
}
