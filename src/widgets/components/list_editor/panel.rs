use crate::form::Form;
use log::debug;

/// An open sub-form editing one list element.
pub struct Panel {
    pub index: usize,
    pub form: Form,
}

/// Modal sub-forms of one list editor; the last entry is the interactive one.
pub struct PanelStack {
    stack: Vec<Panel>,
    max_depth: usize,
}

impl Default for PanelStack {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PanelStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Opens a panel, closing the oldest ones beyond the depth cap.
    pub fn open(&mut self, panel: Panel) {
        self.stack.retain(|current| current.index != panel.index);
        while self.stack.len() >= self.max_depth {
            let closed = self.stack.remove(0);
            debug!("closing panel for element {} to stay within depth", closed.index);
        }
        self.stack.push(panel);
    }

    pub fn close_top(&mut self) -> Option<Panel> {
        self.stack.pop()
    }

    pub fn close_index(&mut self, index: usize) -> Option<Panel> {
        let idx = self.stack.iter().position(|panel| panel.index == index)?;
        Some(self.stack.remove(idx))
    }

    /// Re-points open panels after the element at `removed` left the list.
    pub fn shift_after_removal(&mut self, removed: usize) {
        for panel in &mut self.stack {
            if panel.index > removed {
                panel.index -= 1;
            }
        }
    }

    pub fn active(&self) -> Option<&Panel> {
        self.stack.last()
    }

    pub fn active_mut(&mut self) -> Option<&mut Panel> {
        self.stack.last_mut()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
