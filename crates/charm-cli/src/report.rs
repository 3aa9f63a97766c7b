//! Terminal report of a charm search.

use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use std::io::{self, Write};
use std::time::Duration;

use charm_core::{Ability, Algorithm, Charm, Config, EvalResult, PruneReport};

use crate::theme::{rgb, Theme};

/// How a stat line is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Weighted but absent from the set
    Muted,
    Normal,
    Capped,
    /// Sum points away from the cap
    Negative,
}

/// One line of the set stats block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLine {
    pub text: String,
    pub tone: Tone,
    /// The ability has a configured weight
    pub weighted: bool,
}

/// Format an ability value the way the game shows it.
pub fn format_value(ability: Ability, value: f64, signed: bool) -> String {
    let suffix = if ability.is_percent() { "%" } else { "" };
    if ability.round_to_integer() {
        let v = value.round() as i32;
        if signed {
            format!("{:+}{}", v, suffix)
        } else {
            format!("{}{}", v, suffix)
        }
    } else {
        let v = (value * 100.0).round() / 100.0;
        if signed {
            format!("{:+.2}{}", v, suffix)
        } else {
            format!("{:.2}{}", v, suffix)
        }
    }
}

/// Build the stats block for a result.
///
/// Abilities with a zero sum are listed only when they are weighted.
pub fn stat_lines(result: &EvalResult, catalog: &[Charm], config: &Config) -> Vec<StatLine> {
    let totals = result.totals(catalog);
    let mut lines = Vec::new();

    for ability in Ability::ALL {
        let value = totals[ability.index()];
        let cap = ability.cap();
        let name = ability.display_name();
        let weighted = config.weights.contains_key(&ability);

        let (text, tone) = if value == 0.0 {
            if !weighted {
                continue;
            }
            (name.to_string(), Tone::Muted)
        } else if (value < 0.0) == ability.is_negative() {
            if value.abs() > cap.abs() {
                let overflow = value.abs() - cap.abs();
                (
                    format!(
                        "{} {} ({} overflow)",
                        name,
                        format_value(ability, cap, true),
                        format_value(ability, overflow, false)
                    ),
                    Tone::Capped,
                )
            } else if value.abs() == cap.abs() {
                (format!("{} {}", name, format_value(ability, cap, true)), Tone::Capped)
            } else {
                (format!("{} {}", name, format_value(ability, value, true)), Tone::Normal)
            }
        } else {
            (format!("{} {}", name, format_value(ability, value, true)), Tone::Negative)
        };

        lines.push(StatLine { text, tone, weighted });
    }

    lines
}

/// Mean and population standard deviation of run times in nanoseconds.
pub fn mean_stddev(samples: &[f64]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Writes report sections to any `Write`, colored according to the theme.
pub struct Report<W: Write> {
    out: W,
    theme: Theme,
}

impl<W: Write> Report<W> {
    pub fn new(out: W, theme: Theme) -> Self {
        Self { out, theme }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, Print(text))
    }

    fn colored(&mut self, color: Color, text: &str) -> io::Result<()> {
        if self.theme.ansi {
            queue!(self.out, SetForegroundColor(color), Print(text), ResetColor)
        } else {
            self.text(text)
        }
    }

    fn value(&mut self, text: &str) -> io::Result<()> {
        self.colored(self.theme.value, text)
    }

    fn muted(&mut self, text: &str) -> io::Result<()> {
        self.colored(self.theme.muted, text)
    }

    fn newline(&mut self) -> io::Result<()> {
        self.text("\n")
    }

    /// `  <name> (<power>)` in the charm's rarity color.
    fn charm_line(&mut self, charm: &Charm) -> io::Result<()> {
        self.text("  ")?;
        self.colored(rgb(charm.color()), &charm.name)?;
        self.text(" (")?;
        self.value(&charm.power.to_string())?;
        self.text(")")?;
        self.newline()
    }

    pub fn banner(&mut self) -> io::Result<()> {
        self.text("Starting charm optimizer ")?;
        self.colored(self.theme.accent, env!("CARGO_PKG_VERSION"))?;
        self.newline()
    }

    pub fn config(&mut self, config: &Config) -> io::Result<()> {
        self.text("Config:\n  charm_power")?;
        self.muted(" = ")?;
        self.value(&config.max_power.to_string())?;
        self.newline()?;

        self.text("Weights:\n")?;
        for (ability, weight) in &config.weights {
            self.text(&format!("  {}", ability.id()))?;
            self.muted(" = ")?;
            self.value(&weight.to_string())?;
            self.newline()?;
        }
        Ok(())
    }

    pub fn catalog(&mut self, charms: &[Charm]) -> io::Result<()> {
        self.text("Charms:\n")?;
        for charm in charms {
            self.charm_line(charm)?;
        }
        Ok(())
    }

    pub fn algorithm(&mut self, algo: &Algorithm) -> io::Result<()> {
        self.text("Algorithm: ")?;
        self.colored(self.theme.accent, algo.name())?;
        self.text(" with ")?;
        self.value(&algo.threads().to_string())?;
        self.text(" worker(s)")?;
        self.newline()
    }

    pub fn elapsed(&mut self, elapsed: Duration) -> io::Result<()> {
        self.text("Charm eval took ")?;
        self.value(&format!("{:.4}", elapsed.as_secs_f64() * 1000.0))?;
        self.text(" milliseconds")?;
        self.newline()
    }

    /// Reducer output, printed before the search starts.
    pub fn trace(&mut self, report: &PruneReport<'_>) -> io::Result<()> {
        self.muted("prune - only considering abilities:\n")?;
        for ability in &report.abilities {
            self.muted(&format!("  - {}\n", ability))?;
        }
        self.muted("prune - only considering charms:\n")?;
        for charm in &report.charms {
            self.muted(&format!("  - {}\n", charm))?;
        }
        self.flush()
    }

    pub fn result(
        &mut self,
        result: &EvalResult,
        catalog: &[Charm],
        config: &Config,
    ) -> io::Result<()> {
        self.text("Optimal charm set (")?;
        self.value(&result.utility.to_string())?;
        self.text("):\n")?;
        for &id in &result.charms {
            self.charm_line(&catalog[id as usize])?;
        }

        self.text("Charm power used: ")?;
        self.value(&result.power_used(catalog).to_string())?;
        self.text("/")?;
        self.value(&config.max_power.to_string())?;
        self.newline()?;

        self.text("Set stats:\n")?;
        self.stats(&stat_lines(result, catalog, config))
    }

    pub fn stats(&mut self, lines: &[StatLine]) -> io::Result<()> {
        for line in lines {
            let color = match line.tone {
                Tone::Muted => self.theme.muted,
                Tone::Normal => self.theme.normal,
                Tone::Capped => self.theme.capped,
                Tone::Negative => self.theme.negative,
            };
            let bold = line.weighted && self.theme.ansi;
            if bold {
                queue!(self.out, SetAttribute(Attribute::Bold))?;
            }
            self.colored(color, &line.text)?;
            if bold {
                queue!(self.out, SetAttribute(Attribute::Reset))?;
            }
            self.newline()?;
        }
        Ok(())
    }

    /// Utility, one catalog index per line, a blank line, then the stats.
    pub fn bot(
        &mut self,
        result: &EvalResult,
        catalog: &[Charm],
        config: &Config,
    ) -> io::Result<()> {
        self.text(&format!("{}\n", result.utility))?;
        for id in &result.charms {
            self.text(&format!("{}\n", id))?;
        }
        self.newline()?;
        self.stats(&stat_lines(result, catalog, config))
    }

    pub fn benchmark_run(&mut self, run: usize, nanos: f64) -> io::Result<()> {
        self.text("run ")?;
        self.value(&run.to_string())?;
        self.text(" took ")?;
        self.value(&format!("{:.4}", nanos))?;
        self.text(" ns")?;
        self.newline()
    }

    pub fn benchmark_summary(&mut self, samples: &[f64]) -> io::Result<()> {
        let (mean, stddev) = mean_stddev(samples);
        self.text("mean = ")?;
        self.value(&format!("{:.4}", mean))?;
        self.text(" stddev = ")?;
        self.value(&format!("{:.4}", stddev))?;
        self.newline()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
