use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier state, using the X11 modifier mask bits.
    #[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 2;
        const ALT = 1 << 3;
        const SUPER = 1 << 6;
    }
}

impl Modifiers {
    /// Lock, NumLock and ScrollLock do not take part in bindings.
    pub fn from_state(state: u16) -> Modifiers { Modifiers::from_bits_truncate(state) }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::new();
        if self.contains(Modifiers::SUPER) {
            parts.push("Super");
        }
        if self.contains(Modifiers::CONTROL) {
            parts.push("Ctrl");
        }
        if self.contains(Modifiers::ALT) {
            parts.push("Alt");
        }
        if self.contains(Modifiers::SHIFT) {
            parts.push("Shift");
        }
        write!(f, "{}", parts.join(" + "))
    }
}

/// An X keysym, always the unshifted symbol of its key.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct KeySym(pub u32);

const NAMED_KEYSYMS: &[(&str, u32)] = &[
    ("Return", 0xff0d),
    ("Enter", 0xff0d),
    ("Tab", 0xff09),
    ("Space", 0x0020),
    ("Escape", 0xff1b),
    ("Esc", 0xff1b),
    ("BackSpace", 0xff08),
    ("Delete", 0xffff),
    ("Home", 0xff50),
    ("End", 0xff57),
    ("Prior", 0xff55),
    ("PageUp", 0xff55),
    ("Next", 0xff56),
    ("PageDown", 0xff56),
    ("Left", 0xff51),
    ("Up", 0xff52),
    ("Right", 0xff53),
    ("Down", 0xff54),
    ("Print", 0xff61),
    ("Minus", 0x002d),
    ("Equal", 0x003d),
    ("Comma", 0x002c),
    ("Period", 0x002e),
    ("Slash", 0x002f),
    ("Backslash", 0x005c),
    ("Semicolon", 0x003b),
    ("Apostrophe", 0x0027),
    ("Grave", 0x0060),
    ("BracketLeft", 0x005b),
    ("BracketRight", 0x005d),
];

const F1: u32 = 0xffbe;

impl KeySym {
    pub fn name(&self) -> String {
        match self.0 {
            c @ (0x30..=0x39 | 0x61..=0x7a) => (c as u8 as char).to_ascii_uppercase().to_string(),
            f @ F1..=0xffc9 => format!("F{}", f - F1 + 1),
            sym => NAMED_KEYSYMS
                .iter()
                .find(|(_, s)| *s == sym)
                .map(|(name, _)| name.to_string())
                .unwrap_or_else(|| format!("{sym:#x}")),
        }
    }
}

impl FromStr for KeySym {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphanumeric() {
                return Ok(KeySym(c.to_ascii_lowercase() as u32));
            }
            if let Some((_, sym)) = NAMED_KEYSYMS.iter().find(|(_, sym)| *sym == c as u32) {
                return Ok(KeySym(*sym));
            }
        }
        if let Some(n) = s.strip_prefix(['F', 'f']).and_then(|n| n.parse::<u32>().ok()) {
            if (1..=10).contains(&n) {
                return Ok(KeySym(F1 + n - 1));
            }
        }
        NAMED_KEYSYMS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s))
            .map(|(_, sym)| KeySym(*sym))
            .ok_or_else(|| anyhow!("unknown key '{s}'"))
    }
}

fn parse_modifier(part: &str) -> Option<Modifiers> {
    Some(match part.to_lowercase().as_str() {
        "super" | "mod4" | "win" | "meta" => Modifiers::SUPER,
        "alt" | "mod1" => Modifiers::ALT,
        "ctrl" | "control" => Modifiers::CONTROL,
        "shift" => Modifiers::SHIFT,
        _ => return None,
    })
}

/// Splits `s` on `+`, collecting modifiers and returning the single
/// remaining token.
fn split_binding(s: &str) -> anyhow::Result<(Modifiers, &str)> {
    let mut mods = Modifiers::empty();
    let mut key = None;
    for part in s.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match parse_modifier(part) {
            Some(m) => mods.insert(m),
            None if key.is_none() => key = Some(part),
            None => bail!("more than one key in '{s}'"),
        }
    }
    Ok((mods, key.ok_or_else(|| anyhow!("no key in '{s}'"))?))
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub modifiers: Modifiers,
    pub key: KeySym,
}

impl Hotkey {
    pub fn new(modifiers: Modifiers, key: KeySym) -> Self { Self { modifiers, key } }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key.name())
        } else {
            write!(f, "{} + {}", self.modifiers, self.key.name())
        }
    }
}

impl FromStr for Hotkey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (modifiers, key) = split_binding(s)?;
        Ok(Hotkey { modifiers, key: key.parse()? })
    }
}

/// A pointer button together with the modifiers held while pressing it.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ButtonBinding {
    pub modifiers: Modifiers,
    pub button: u8,
}

impl fmt::Display for ButtonBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "Button{}", self.button)
        } else {
            write!(f, "{} + Button{}", self.modifiers, self.button)
        }
    }
}

impl FromStr for ButtonBinding {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (modifiers, key) = split_binding(s)?;
        let button = key
            .strip_prefix("Button")
            .or_else(|| key.strip_prefix("button"))
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=5).contains(n))
            .ok_or_else(|| anyhow!("unknown button '{key}'"))?;
        Ok(ButtonBinding { modifiers, button })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_modifiers_and_keys() {
        let hotkey: Hotkey = "Super + Shift + J".parse().unwrap();
        assert_eq!(hotkey, Hotkey::new(Modifiers::SUPER | Modifiers::SHIFT, KeySym(0x6a)));
        assert_eq!(hotkey.to_string(), "Super + Shift + J");

        let hotkey: Hotkey = "mod1+Return".parse().unwrap();
        assert_eq!(hotkey, Hotkey::new(Modifiers::ALT, KeySym(0xff0d)));
        assert_eq!("Ctrl + F3".parse::<Hotkey>().unwrap().key, KeySym(0xffc0));
        assert_eq!("Super + 1".parse::<Hotkey>().unwrap().key, KeySym(0x31));
        assert_eq!("Super + ,".parse::<Hotkey>().unwrap().key, KeySym(0x2c));
    }

    #[test]
    fn rejects_nonsense() {
        assert!("Super + Shift".parse::<Hotkey>().is_err());
        assert!("Super + J + K".parse::<Hotkey>().is_err());
        assert!("Super + Florp".parse::<Hotkey>().is_err());
    }

    #[test]
    fn parses_buttons() {
        let binding: ButtonBinding = "Super + Button3".parse().unwrap();
        assert_eq!(binding, ButtonBinding { modifiers: Modifiers::SUPER, button: 3 });
        assert!("Super + Button9".parse::<ButtonBinding>().is_err());
    }

    #[test]
    fn state_ignores_lock_keys() {
        // Shift | Lock | Mod2 (NumLock) | Mod4
        assert_eq!(Modifiers::from_state(1 | 2 | 16 | 64), Modifiers::SUPER | Modifiers::SHIFT);
    }
}
