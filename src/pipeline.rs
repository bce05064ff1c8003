use crate::borders;
use crate::check;
use crate::dataset::{Dataset, Feature};
use crate::error::Result;
use crate::rebuild::{rebuild, Rebuilt, DEFAULT_DROP_RATIO};
use crate::simplify::simplify;
use geo_types::{Geometry, Polygon};
use log::{info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The whole pipeline: border extraction, consistency check, per-line
/// simplification, and polygon reconstruction.
///
/// The tolerance is a required parameter. Appropriate values depend on the
/// dataset and the scale of its coordinate reference system; there is no
/// value that makes sense as a default.
pub struct Generalizer {
    tolerance: f64,
    drop_ratio: f64,
}

impl Generalizer {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            drop_ratio: DEFAULT_DROP_RATIO,
        }
    }

    /// Overrides the area-ratio threshold of the drop fallback policy.
    pub fn with_drop_ratio(mut self, drop_ratio: f64) -> Self {
        self.drop_ratio = drop_ratio;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Runs the pipeline over `input` and returns the simplified feature
    /// set: same schema and spatial reference, features in original order
    /// with dropped indices skipped.
    ///
    /// Fatal errors (invalid input geometry, length-conservation violation)
    /// abort the run. Per-feature reconstruction failures only drop that
    /// feature and are reported through the log.
    pub fn run(&self, input: &Dataset) -> Result<Dataset> {
        let shapes: Vec<Polygon<f64>> = input.features.iter().map(|f| f.geometry.clone()).collect();

        let extracted = borders::extract(&shapes)?;
        check::check_lengths(&shapes, &extracted)?;

        info!("building output...");

        let build = |i: usize| -> Rebuilt {
            let mut parts: Vec<Geometry<f64>> = extracted.shared[i]
                .iter()
                .map(|g| simplify(g, self.tolerance))
                .collect();
            parts.push(simplify(
                &Geometry::MultiLineString(extracted.unshared[i].clone()),
                self.tolerance,
            ));
            rebuild(&shapes[i], &parts, self.tolerance, self.drop_ratio)
        };

        #[cfg(feature = "parallel")]
        let outcomes: Vec<Rebuilt> = (0..shapes.len()).into_par_iter().map(build).collect();

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<Rebuilt> = (0..shapes.len()).map(build).collect();

        let mut output = Dataset::new(input.srs.clone(), input.fields.clone());
        for (i, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Rebuilt::Polygon(geometry) => output.push(Feature {
                    geometry,
                    values: input.features[i].values.clone(),
                }),
                Rebuilt::LossyDrop { lost_portion } => warn!(
                    "lost feature #{}, {:.0} times larger than maximum tolerance",
                    i, lost_portion
                ),
                Rebuilt::BenignSkip { .. } => info!("skipped feature #{}", i),
            }
        }
        Ok(output)
    }
}
