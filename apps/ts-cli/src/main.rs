use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use ts_props::{
    Convergence, CoolPropOracle, EosOracle, Fluid, FluidState, IdealGasOracle, PropertyCode,
    PropertyPair, ResolveError, ResolveResult, resolve,
    units::{display_unit, from_si, to_si},
};

#[derive(Parser)]
#[command(name = "ts-cli")]
#[command(about = "ThermoState CLI - Thermodynamic state resolution tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a thermodynamic state from two independent properties
    Resolve {
        /// Fluid name (e.g. water, air, co2, r134a)
        fluid: String,
        /// First property as CODE=value (e.g. T=25)
        input1: String,
        /// Second property as CODE=value (e.g. P=101.325)
        input2: String,
        /// Interpret inputs and report outputs in SI units (K, Pa, J/kg)
        /// instead of the default display units (°C, kPa, kJ/kg)
        #[arg(long)]
        si: bool,
        /// Emit the resolved state as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Property backend to query
        #[arg(long, value_enum, default_value_t = Backend::Coolprop)]
        backend: Backend,
    },
    /// List supported fluids
    Fluids,
    /// List property codes accepted by `resolve`
    Properties,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// CoolProp HEOS (real fluids)
    Coolprop,
    /// Synthetic ideal-gas backend (deterministic, no CoolProp required)
    Ideal,
}

/// Resolved state in caller-facing units, one field per reported quantity.
#[derive(Serialize)]
struct StateReport {
    fluid: String,
    backend: String,
    region: String,
    quality: Option<f64>,
    converged: bool,
    temperature: f64,
    pressure: f64,
    density_kg_m3: f64,
    specific_volume_m3_kg: f64,
    enthalpy: f64,
    internal_energy: f64,
    entropy: f64,
    units: Units,
}

#[derive(Serialize)]
struct Units {
    temperature: &'static str,
    pressure: &'static str,
    enthalpy: &'static str,
    entropy: &'static str,
}

fn main() -> ResolveResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            fluid,
            input1,
            input2,
            si,
            json,
            backend,
        } => cmd_resolve(&fluid, &input1, &input2, si, json, backend),
        Commands::Fluids => cmd_fluids(),
        Commands::Properties => cmd_properties(),
    }
}

fn cmd_resolve(
    fluid: &str,
    input1: &str,
    input2: &str,
    si: bool,
    json: bool,
    backend: Backend,
) -> ResolveResult<()> {
    let fluid: Fluid = fluid.parse()?;
    let (c1, v1) = parse_input(input1, si)?;
    let (c2, v2) = parse_input(input2, si)?;
    let pair = PropertyPair::new(c1, v1, c2, v2)?;

    let state = match backend {
        Backend::Coolprop => resolve(&CoolPropOracle::new(), fluid, &pair)?,
        Backend::Ideal => resolve(&IdealGasOracle::default(), fluid, &pair)?,
    };

    let report = build_report(fluid, backend, &state, si);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(|err| ResolveError::Backend {
                message: format!("JSON serialization failed: {err}"),
            })?
        );
    } else {
        print_report(&report);
    }
    Ok(())
}

fn cmd_fluids() -> ResolveResult<()> {
    println!("Supported fluids:");
    for fluid in Fluid::ALL {
        println!("  {:<16} {}", fluid.coolprop_name().to_lowercase(), fluid.label());
    }
    Ok(())
}

fn cmd_properties() -> ResolveResult<()> {
    println!("Property codes (inputs are CODE=value):");
    for code in PropertyCode::ALL {
        println!(
            "  {:<2} {:<26} display: {:<10} SI: {}",
            code.short_code(),
            code.label(),
            display_unit(code),
            code.si_unit()
        );
    }
    Ok(())
}

/// Parse a `CODE=value` argument into an SI (code, value) entry.
fn parse_input(arg: &str, si: bool) -> ResolveResult<(PropertyCode, f64)> {
    let (code_str, value_str) = arg.split_once('=').ok_or_else(|| ResolveError::InvalidInput {
        what: format!("expected CODE=value, got '{arg}'"),
    })?;
    let code: PropertyCode = code_str.parse()?;
    let value: f64 = value_str
        .trim()
        .parse()
        .map_err(|_| ResolveError::InvalidInput {
            what: format!("'{value_str}' is not a number"),
        })?;
    let value = if si { value } else { to_si(code, value) };
    Ok((code, value))
}

fn build_report(fluid: Fluid, backend: Backend, state: &FluidState, si: bool) -> StateReport {
    let convert = |code: PropertyCode, value: f64| -> f64 {
        if si { value } else { from_si(code, value) }
    };
    let unit = |code: PropertyCode| -> &'static str {
        if si { code.si_unit() } else { display_unit(code) }
    };
    let backend_name = match backend {
        Backend::Coolprop => CoolPropOracle::new().name().to_string(),
        Backend::Ideal => IdealGasOracle::default().name().to_string(),
    };
    StateReport {
        fluid: fluid.label().to_string(),
        backend: backend_name,
        region: state.region.to_string(),
        quality: state.quality,
        converged: state.convergence == Convergence::Converged,
        temperature: convert(PropertyCode::Temperature, state.temperature_k()),
        pressure: convert(PropertyCode::Pressure, state.pressure_pa()),
        density_kg_m3: state.density_kg_m3(),
        specific_volume_m3_kg: state.specific_volume_m3_kg(),
        enthalpy: convert(PropertyCode::Enthalpy, state.enthalpy),
        internal_energy: convert(PropertyCode::InternalEnergy, state.internal_energy),
        entropy: convert(PropertyCode::Entropy, state.entropy),
        units: Units {
            temperature: unit(PropertyCode::Temperature),
            pressure: unit(PropertyCode::Pressure),
            enthalpy: unit(PropertyCode::Enthalpy),
            entropy: unit(PropertyCode::Entropy),
        },
    }
}

fn print_report(report: &StateReport) {
    println!("Fluid:   {} ({})", report.fluid, report.backend);
    println!("Region:  {}", report.region);
    if let Some(quality) = report.quality {
        println!("Quality: {:.6}", quality);
    }
    if !report.converged {
        println!("Note:    best-effort result (solver hit its iteration cap)");
    }
    println!();
    println!(
        "  Temperature:      {:>14.6} {}",
        report.temperature, report.units.temperature
    );
    println!(
        "  Pressure:         {:>14.6} {}",
        report.pressure, report.units.pressure
    );
    println!("  Density:          {:>14.6} kg/m³", report.density_kg_m3);
    println!(
        "  Specific volume:  {:>14.9} m³/kg",
        report.specific_volume_m3_kg
    );
    println!(
        "  Enthalpy:         {:>14.6} {}",
        report.enthalpy, report.units.enthalpy
    );
    println!(
        "  Internal energy:  {:>14.6} {}",
        report.internal_energy, report.units.enthalpy
    );
    println!(
        "  Entropy:          {:>14.6} {}",
        report.entropy, report.units.entropy
    );
}
