// MIT License - Copyright (c) 2026 Peter Wright
// Command parsing and dispatch

use std::collections::HashMap;
use std::io::Write;

use tracing::debug;

use crate::cache::StateCache;
use crate::console::Console;
use crate::devices::Mode;
use crate::dispatcher::ModeChangeDispatcher;
use crate::verbosity::Verbosity;

pub const INVALID_AREA: &str = "Invalid area id.";
pub const EMPTY_LINE_HINT: &str = "Type 'help' for a list of commands.";

/// What a command name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Areas,
    Info,
    Zones,
    SetMode(Mode),
    Debug,
    Help,
}

/// One entry of the command table.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub command: Command,
}

/// Every command the shell accepts, in help order.
pub const COMMANDS: [CommandSpec; 9] = [
    CommandSpec {
        name: "areas",
        usage: "areas",
        summary: "List all areas and their modes",
        command: Command::Areas,
    },
    CommandSpec {
        name: "info",
        usage: "info",
        summary: "Show panel information",
        command: Command::Info,
    },
    CommandSpec {
        name: "zones",
        usage: "zones [area_id]",
        summary: "List zones, for every area or for one area",
        command: Command::Zones,
    },
    CommandSpec {
        name: "full_set",
        usage: "full_set <area_id>",
        summary: "Fully arm an area",
        command: Command::SetMode(Mode::FullSet),
    },
    CommandSpec {
        name: "unset",
        usage: "unset <area_id>",
        summary: "Disarm an area",
        command: Command::SetMode(Mode::Unset),
    },
    CommandSpec {
        name: "part_set_a",
        usage: "part_set_a <area_id>",
        summary: "Partially arm an area (preset A)",
        command: Command::SetMode(Mode::PartSetA),
    },
    CommandSpec {
        name: "part_set_b",
        usage: "part_set_b <area_id>",
        summary: "Partially arm an area (preset B)",
        command: Command::SetMode(Mode::PartSetB),
    },
    CommandSpec {
        name: "debug",
        usage: "debug",
        summary: "Toggle debug logging",
        command: Command::Debug,
    },
    CommandSpec {
        name: "help",
        usage: "help",
        summary: "Show this help",
        command: Command::Help,
    },
];

/// Split a line into a command token and an optional argument.
///
/// The argument is the rest of the line after the first run of whitespace,
/// trimmed; an all-whitespace remainder counts as no argument.
pub fn parse_line(line: &str) -> Option<(&str, Option<&str>)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => {
            let rest = rest.trim();
            Some((name, (!rest.is_empty()).then_some(rest)))
        }
        None => Some((line, None)),
    }
}

/// Everything a command may touch while it runs.
///
/// The cache is borrowed read-only: commands never mutate panel state.
pub struct ShellContext<'a, W: Write> {
    pub cache: &'a StateCache,
    pub dispatcher: &'a mut ModeChangeDispatcher,
    pub console: &'a mut Console<W>,
}

/// Translates operator lines into validated actions.
pub struct CommandShell {
    table: HashMap<&'static str, CommandSpec>,
    verbosity: Verbosity,
}

impl CommandShell {
    pub fn new(verbosity: Verbosity) -> Self {
        let table = COMMANDS.iter().map(|spec| (spec.name, *spec)).collect();
        Self { table, verbosity }
    }

    pub fn verbosity(&self) -> &Verbosity {
        &self.verbosity
    }

    /// Resolve a command name.
    pub fn lookup(&self, name: &str) -> Option<&CommandSpec> {
        self.table.get(name)
    }

    /// Parse and run one input line. Never fails: every problem is reported
    /// on the console and the shell carries on.
    pub fn dispatch<W: Write>(&mut self, line: &str, ctx: &mut ShellContext<'_, W>) {
        let Some((name, arg)) = parse_line(line) else {
            ctx.console.line(EMPTY_LINE_HINT);
            return;
        };
        let Some(spec) = self.lookup(name).copied() else {
            ctx.console.line(format_args!("Unknown command: {name}. {EMPTY_LINE_HINT}"));
            return;
        };
        debug!(command = spec.name, arg, "Dispatching command");

        match spec.command {
            Command::Areas => Self::areas(ctx),
            Command::Info => ctx.console.line(ctx.cache.panel()),
            Command::Zones => Self::zones(arg, ctx),
            Command::SetMode(mode) => Self::set_mode(&spec, mode, arg, ctx),
            Command::Debug => self.toggle_debug(ctx),
            Command::Help => Self::help(ctx),
        }
    }

    fn areas<W: Write>(ctx: &mut ShellContext<'_, W>) {
        for area in ctx.cache.areas() {
            ctx.console.line(area);
        }
    }

    fn zones<W: Write>(arg: Option<&str>, ctx: &mut ShellContext<'_, W>) {
        match arg {
            Some(id) => {
                let Some(area) = ctx.cache.area(id) else {
                    ctx.console.line(INVALID_AREA);
                    return;
                };
                for zone in &area.zones {
                    ctx.console.line(zone);
                }
            }
            None => {
                for area in ctx.cache.areas() {
                    ctx.console.line(format_args!("Area {} ({}):", area.id, area.name));
                    for zone in &area.zones {
                        ctx.console.line(zone);
                    }
                }
            }
        }
    }

    fn set_mode<W: Write>(
        spec: &CommandSpec,
        mode: Mode,
        arg: Option<&str>,
        ctx: &mut ShellContext<'_, W>,
    ) {
        let Some(id) = arg else {
            ctx.console.line(format_args!("Usage: {}", spec.usage));
            return;
        };
        if !ctx.cache.contains_area(id) {
            ctx.console.line(INVALID_AREA);
            return;
        }
        ctx.dispatcher.request(id, mode);
    }

    fn toggle_debug<W: Write>(&mut self, ctx: &mut ShellContext<'_, W>) {
        self.verbosity.toggle();
        let state = if self.verbosity.is_debug() { "enabled" } else { "disabled" };
        ctx.console.line(format_args!("Debug logging {state}"));
    }

    fn help<W: Write>(ctx: &mut ShellContext<'_, W>) {
        ctx.console.line("Commands:");
        for spec in &COMMANDS {
            ctx.console.line(format_args!("  {:<22} {}", spec.usage, spec.summary));
        }
    }
}
