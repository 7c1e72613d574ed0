use std::io::{self, BufRead, Write};
use std::str::FromStr;

use schick_core::core_api::{CoreError, HeroSummary, Session};

/// Result of one menu interaction inside the hero editor.
///
/// "Exit without saving" can be chosen from the nested field prompt, two
/// loop levels deep; returning an action up the call chain keeps that
/// escape without terminating the process from library code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Continue,
    FinishHero,
    AbortSession,
}

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Save,
    Abort,
}

/// Run the hero-selection loop over the active group. `input`/`out` are
/// generic so scripted sessions can drive the editor in tests.
pub fn run_session<I: BufRead, O: Write>(
    session: &mut Session,
    input: &mut I,
    out: &mut O,
) -> io::Result<SessionOutcome> {
    let active = session.active_heroes();
    if active.is_empty() {
        writeln!(out, "No heroes in the active group.")?;
        return Ok(SessionOutcome::Abort);
    }

    writeln!(out, "\nHeroes in active group:")?;
    for (pos, hero) in active.iter().enumerate() {
        writeln!(
            out,
            "{}. {} (Lvl {}, Exp: {})",
            pos + 1,
            hero.name,
            hero.level,
            hero.exp
        )?;
    }

    loop {
        write!(
            out,
            "\nSelect hero to edit (1-{}), 'save' to save, or 'exit' to quit: ",
            active.len()
        )?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            writeln!(out, "\nExiting without saving...")?;
            return Ok(SessionOutcome::Abort);
        };
        let choice = line.trim().to_lowercase();

        if choice == "exit" {
            writeln!(out, "Exiting without saving...")?;
            return Ok(SessionOutcome::Abort);
        }
        if choice == "save" {
            return Ok(SessionOutcome::Save);
        }

        match choice.parse::<usize>() {
            Ok(n) if n >= 1 && n <= active.len() => {
                let hero_index = active[n - 1].index;
                if edit_hero(session, hero_index, input, out)? == EditorAction::AbortSession {
                    writeln!(out, "Exiting without saving...")?;
                    return Ok(SessionOutcome::Abort);
                }
            }
            Ok(_) => writeln!(out, "Invalid hero number. Please try again.")?,
            Err(_) => writeln!(out, "Invalid input. Please try again.")?,
        }
    }
}

fn edit_hero<I: BufRead, O: Write>(
    session: &mut Session,
    hero_index: usize,
    input: &mut I,
    out: &mut O,
) -> io::Result<EditorAction> {
    loop {
        let hero = match session.hero(hero_index) {
            Ok(h) => h,
            Err(e) => {
                writeln!(out, "{e}")?;
                return Ok(EditorAction::FinishHero);
            }
        };

        writeln!(out, "\nEditing {}", hero.name)?;
        writeln!(out, "1. Experience: {}", hero.exp)?;
        writeln!(out, "2. Money: {}", hero.money)?;
        writeln!(out, "3. Level: {}", hero.level)?;
        writeln!(
            out,
            "4. Vital Energy (Current/Max): {}/{}",
            hero.vital_energy.current, hero.vital_energy.max
        )?;
        writeln!(
            out,
            "5. Astral Energy (Current/Max): {}/{}",
            hero.astral_energy.current, hero.astral_energy.max
        )?;
        writeln!(out, "6. Done editing")?;
        writeln!(out, "0. Exit without saving")?;
        write!(out, "\nSelect field to edit (1-5), 6 to finish, or 0 to exit: ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(EditorAction::AbortSession);
        };

        match apply_choice(session, &hero, line.trim(), input, out)? {
            EditorAction::Continue => {}
            action => return Ok(action),
        }
    }
}

fn apply_choice<I: BufRead, O: Write>(
    session: &mut Session,
    hero: &HeroSummary,
    choice: &str,
    input: &mut I,
    out: &mut O,
) -> io::Result<EditorAction> {
    match choice {
        "0" => return Ok(EditorAction::AbortSession),
        "6" => return Ok(EditorAction::FinishHero),
        "1" => {
            let prompt = format!("New experience (current: {}): ", hero.exp);
            if let Some(v) = prompt_parsed::<i32, _, _>(input, out, &prompt)? {
                report(session.set_exp(hero.index, v), out)?;
            }
        }
        "2" => {
            let prompt = format!("New money (current: {}): ", hero.money);
            if let Some(v) = prompt_parsed::<i32, _, _>(input, out, &prompt)? {
                report(session.set_money(hero.index, v), out)?;
            }
        }
        "3" => {
            let prompt = format!("New level (current: {}): ", hero.level);
            if let Some(v) = prompt_parsed::<u8, _, _>(input, out, &prompt)? {
                report(session.set_level(hero.index, v), out)?;
            }
        }
        "4" => {
            let prompt = format!(
                "New current vital energy (current: {}): ",
                hero.vital_energy.current
            );
            if let Some(v) = prompt_parsed::<u16, _, _>(input, out, &prompt)? {
                report(session.set_vital_energy_current(hero.index, v), out)?;
            }
            let prompt = format!("New max vital energy (current: {}): ", hero.vital_energy.max);
            if let Some(v) = prompt_parsed::<u16, _, _>(input, out, &prompt)? {
                report(session.set_vital_energy_max(hero.index, v), out)?;
            }
        }
        "5" => {
            let prompt = format!(
                "New current astral energy (current: {}): ",
                hero.astral_energy.current
            );
            if let Some(v) = prompt_parsed::<u16, _, _>(input, out, &prompt)? {
                report(session.set_astral_energy_current(hero.index, v), out)?;
            }
            let prompt = format!(
                "New max astral energy (current: {}): ",
                hero.astral_energy.max
            );
            if let Some(v) = prompt_parsed::<u16, _, _>(input, out, &prompt)? {
                report(session.set_astral_energy_max(hero.index, v), out)?;
            }
        }
        _ => writeln!(out, "Invalid choice. Please try again.")?,
    }
    Ok(EditorAction::Continue)
}

fn report<O: Write>(result: Result<(), CoreError>, out: &mut O) -> io::Result<()> {
    if let Err(e) = result {
        writeln!(out, "{e}")?;
    }
    Ok(())
}

fn prompt_parsed<T: FromStr, I: BufRead, O: Write>(
    input: &mut I,
    out: &mut O,
    prompt: &str,
) -> io::Result<Option<T>> {
    write!(out, "{prompt}")?;
    out.flush()?;

    let Some(line) = read_line(input)? else {
        return Ok(None);
    };
    match line.trim().parse::<T>() {
        Ok(v) => Ok(Some(v)),
        Err(_) => {
            writeln!(out, "Please enter a valid number.")?;
            Ok(None)
        }
    }
}

fn read_line<I: BufRead>(input: &mut I) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
