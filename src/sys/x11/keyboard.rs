use tracing::{debug, trace};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt as _, GrabMode, Keycode, ModMask, Window};

use crate::sys::backend::BackendError;
use crate::sys::hotkey::{Hotkey, KeySym, Modifiers};

const NUM_LOCK: u32 = 0xff7f;

/// The server's keycode to keysym table, plus which modifier bit NumLock
/// sits on.
pub struct Keyboard {
    min_keycode: Keycode,
    keysyms_per_keycode: usize,
    keysyms: Vec<u32>,
    num_lock: u16,
}

impl Keyboard {
    pub fn load(conn: &impl Connection) -> Result<Keyboard, BackendError> {
        let setup = conn.setup();
        let (min_keycode, max_keycode) = (setup.min_keycode, setup.max_keycode);
        let mapping = conn.get_keyboard_mapping(min_keycode, max_keycode - min_keycode + 1)?.reply()?;
        let mut keyboard = Keyboard {
            min_keycode,
            keysyms_per_keycode: mapping.keysyms_per_keycode.into(),
            keysyms: mapping.keysyms,
            num_lock: 0,
        };

        let modifiers = conn.get_modifier_mapping()?.reply()?;
        let per_modifier = modifiers.keycodes_per_modifier() as usize;
        if per_modifier > 0 {
            for (bit, keycodes) in modifiers.keycodes.chunks(per_modifier).enumerate() {
                if keycodes.iter().any(|&k| keyboard.keysym(k) == Some(KeySym(NUM_LOCK))) {
                    keyboard.num_lock = 1 << bit;
                }
            }
        }
        debug!(num_lock = keyboard.num_lock, "loaded keyboard mapping");
        Ok(keyboard)
    }

    /// The unshifted keysym on `keycode`.
    pub fn keysym(&self, keycode: Keycode) -> Option<KeySym> {
        let idx = keycode.checked_sub(self.min_keycode)? as usize * self.keysyms_per_keycode;
        self.keysyms.get(idx).copied().filter(|&sym| sym != 0).map(KeySym)
    }

    fn keycodes(&self, key: KeySym) -> Vec<Keycode> {
        if self.keysyms_per_keycode == 0 {
            return Vec::new();
        }
        self.keysyms
            .chunks(self.keysyms_per_keycode)
            .enumerate()
            .filter(|(_, syms)| syms.first() == Some(&key.0))
            .filter_map(|(i, _)| u8::try_from(i).ok()?.checked_add(self.min_keycode))
            .collect()
    }

    /// Modifiers from an event state, ignoring CapsLock and NumLock.
    pub fn modifiers(&self, state: u16) -> Modifiers { Modifiers::from_state(state & !self.num_lock) }

    /// `modifiers` with every combination of CapsLock and NumLock, so grabs
    /// work whatever the lock state.
    pub fn lock_variants(&self, modifiers: Modifiers) -> [ModMask; 4] {
        let base = modifiers.bits();
        let caps = u16::from(ModMask::LOCK);
        [base, base | caps, base | self.num_lock, base | caps | self.num_lock].map(ModMask::from)
    }

    pub fn grab_keys(
        &self,
        conn: &impl Connection,
        root: Window,
        hotkeys: &[Hotkey],
    ) -> Result<(), BackendError> {
        conn.ungrab_key(x11rb::protocol::xproto::Grab::ANY, root, ModMask::ANY)?;
        for hotkey in hotkeys {
            let keycodes = self.keycodes(hotkey.key);
            trace!(%hotkey, ?keycodes, "grabbing");
            for keycode in keycodes {
                for modifiers in self.lock_variants(hotkey.modifiers) {
                    conn.grab_key(false, root, modifiers, keycode, GrabMode::ASYNC, GrabMode::ASYNC)?;
                }
            }
        }
        Ok(())
    }
}
