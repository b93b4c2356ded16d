use tracing::{debug, info, warn};

use super::Reactor;
use crate::common::collections::HashSet;
use crate::common::config::PanelPosition;
use crate::model::monitor::{Output, OutputId, Strut};

impl Reactor {
    /// Brings the monitor list in line with the outputs the display server
    /// reports. Removed outputs hide their desktop, resized ones are laid out
    /// again and new ones take the lowest desktop nobody shows.
    pub(crate) fn on_outputs_changed(&mut self, outputs: Vec<Output>) {
        if outputs.is_empty() {
            warn!("display server reported no outputs, keeping the current monitors");
            return;
        }
        let reported: HashSet<OutputId> = outputs.iter().map(|o| o.id).collect();

        let gone: Vec<OutputId> = self
            .state
            .monitors()
            .iter()
            .map(|m| m.output)
            .filter(|id| !reported.contains(id))
            .collect();
        for output in gone {
            if let Some(monitor) = self.state.remove_monitor(output) {
                self.unmap_desktop(monitor.desktop);
            }
        }

        let mut added = Vec::new();
        for output in &outputs {
            match self.state.monitor_index(output.id) {
                Some(idx) => {
                    let Some(monitor) = self.state.monitor_mut(idx) else {
                        continue;
                    };
                    if monitor.rect != output.rect {
                        debug!(output = %output.id, ?output.rect, "output resized");
                        monitor.rect = output.rect;
                    }
                }
                None => {
                    let strut = self.strut_for(self.state.monitors().len());
                    match self.state.add_monitor(*output, strut) {
                        Some(idx) => added.push(idx),
                        None => info!(output = %output.id, "every desktop is already shown, ignoring output"),
                    }
                }
            }
        }

        for idx in 0..self.state.monitors().len() {
            let strut = self.strut_for(idx);
            if let Some(monitor) = self.state.monitor_mut(idx) {
                monitor.strut = strut;
            }
        }

        let shown: Vec<usize> = self.state.monitors().iter().map(|m| m.desktop).collect();
        for desktop in shown {
            self.relayout(desktop);
        }
        for idx in added {
            let desktop = self.state.monitors()[idx].desktop;
            self.map_desktop(desktop);
        }
        if let Some(desktop) = self.state.selected_desktop() {
            let current = self.state.desktops[desktop].current();
            self.focus(desktop, current);
        }
    }

    /// Panel space reserved on the monitor at `idx`.
    fn strut_for(&self, idx: usize) -> Strut {
        let panel = &self.config.settings.panel;
        if panel.height <= 0 || (idx > 0 && !panel.all_monitors) {
            return Strut::default();
        }
        match panel.position {
            PanelPosition::Top => Strut { top: panel.height, bottom: 0 },
            PanelPosition::Bottom => Strut { top: 0, bottom: panel.height },
        }
    }
}
