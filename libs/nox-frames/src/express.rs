use tracing::trace;

use crate::{ReferenceFrame, Result, Vector};

impl Vector {
    /// Rewrites every term in the basis of `frame`.
    ///
    /// Each group of terms fixed in another frame is mapped through the
    /// direction cosine matrix from that frame to `frame`; terms already in
    /// `frame` pass through untouched.
    pub fn express(&self, frame: &ReferenceFrame) -> Result<Vector> {
        let mut out = Vector::zero();
        for (home, components) in self.by_frame() {
            if home == *frame {
                out += Vector::from_components(frame, components);
                continue;
            }
            trace!(from = %home, to = %frame, "express");
            let dcm = home.dcm(frame)?;
            out += Vector::from_components(frame, dcm.dot(&components));
        }
        Ok(out.auto_simplify())
    }
}
