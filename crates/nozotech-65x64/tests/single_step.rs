//! Single-step fixtures.
//!
//! Each case in `tests/data/bundles.json` gives a register state and memory
//! image, runs exactly one `step()` and compares registers, memory, cycles,
//! stop reason and any captured coprocessor payload.

use std::fs;
use std::path::Path;

use emu_core::{Bus, Cpu, SimpleBus};
use nozotech_65x64::{Config, Emu65x64, Reg, Status};
use serde::Deserialize;

/// JSON test case format.
#[derive(Deserialize)]
struct TestCase {
    name: String,
    initial: CpuState,
    #[serde(rename = "final")]
    final_state: CpuState,
    cycles: u64,
    stop_reason: String,
    #[serde(default)]
    cop: Option<CopState>,
}

/// JSON CPU state format.
#[derive(Deserialize)]
struct CpuState {
    pc: u64,
    a: u64,
    x: u64,
    y: u64,
    sp: u64,
    p: u8,
    #[serde(default)]
    emulation: bool,
    #[serde(default)]
    z: Vec<(usize, u64)>,
    /// Memory blocks as (address, bytes).
    ram: Vec<(u64, Vec<u8>)>,
}

#[derive(Deserialize)]
struct CopState {
    opcode: u8,
    words: Vec<u16>,
}

/// Set up the CPU and bus from the initial test state.
fn setup(state: &CpuState) -> (Emu65x64, SimpleBus) {
    let mut bus = SimpleBus::new();
    for (address, bytes) in &state.ram {
        bus.load(*address, bytes);
    }

    let mut cpu = Emu65x64::with_config(Config {
        emulation: state.emulation,
    });
    cpu.regs.pc = state.pc;
    cpu.regs.a = Reg(state.a);
    cpu.regs.x = Reg(state.x);
    cpu.regs.y = Reg(state.y);
    cpu.regs.sp = Reg(state.sp);
    cpu.regs.p = Status(state.p);
    for &(index, value) in &state.z {
        cpu.regs.z[index] = Reg(value);
    }
    (cpu, bus)
}

/// Compare the CPU/bus state against expected, returning a list of mismatches.
fn compare(cpu: &Emu65x64, bus: &mut SimpleBus, case: &TestCase) -> Vec<String> {
    let expected = &case.final_state;
    let mut errors = Vec::new();

    let registers = [
        ("PC", cpu.regs.pc, expected.pc),
        ("A", cpu.regs.a.q(), expected.a),
        ("X", cpu.regs.x.q(), expected.x),
        ("Y", cpu.regs.y.q(), expected.y),
        ("SP", cpu.regs.sp.q(), expected.sp),
        ("P", u64::from(cpu.regs.p.0), u64::from(expected.p)),
        ("E", u64::from(cpu.regs.e), u64::from(expected.emulation)),
        ("cycles", cpu.cycles(), case.cycles),
    ];
    for (name, got, want) in registers {
        if got != want {
            errors.push(format!("{name}: got ${got:X}, want ${want:X}"));
        }
    }

    if cpu.stop_reason().name() != case.stop_reason {
        errors.push(format!(
            "stop reason: got {}, want {}",
            cpu.stop_reason(),
            case.stop_reason
        ));
    }

    for (address, bytes) in &expected.ram {
        for (offset, &want) in (0u64..).zip(bytes) {
            let got = bus.read_byte(address + offset);
            if got != want {
                errors.push(format!(
                    "RAM[${:X}]: got ${got:02X}, want ${want:02X}",
                    address + offset
                ));
            }
        }
    }

    errors
}

#[test]
fn single_step_fixtures() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/bundles.json");
    let data = fs::read_to_string(&path).expect("fixture file");
    let cases: Vec<TestCase> = serde_json::from_str(&data).expect("valid fixture JSON");
    assert!(!cases.is_empty());

    let mut failures = Vec::new();
    for case in &cases {
        let (mut cpu, mut bus) = setup(&case.initial);
        cpu.step(&mut bus);

        let mut errors = compare(&cpu, &mut bus, case);
        if let Some(cop) = &case.cop {
            let mut words = vec![0u16; usize::from(cpu.cop_inst_size())];
            match cpu.take_cop_inst(&mut words) {
                Ok(opcode) if opcode == cop.opcode && words == cop.words => {}
                Ok(opcode) => errors.push(format!(
                    "COP: got {opcode:#04X} {words:04X?}, want {:#04X} {:04X?}",
                    cop.opcode, cop.words
                )),
                Err(e) => errors.push(format!("COP: {e}")),
            }
        }

        if !errors.is_empty() {
            failures.push(format!("{}:\n  {}", case.name, errors.join("\n  ")));
        }
    }

    assert!(
        failures.is_empty(),
        "{} of {} cases failed:\n{}",
        failures.len(),
        cases.len(),
        failures.join("\n")
    );
}
