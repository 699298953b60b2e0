//! Solid construction for the enclosure.
//!
//! The case is an open-top box: outer block minus cavity, plus one post per
//! mount hole (bored through), minus one wall cutout per edge-assigned
//! connector. Every call rebuilds from the schema; nothing is cached between
//! calls.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::errors::CaseError;
use crate::layout::{CaseLayout, CaseParams};
use fission_kernel::{Kernel, PrismKernel, SplitKeep};
use fission_mesh::save_stl;
use fission_schema::{FissionSchema, SplitType};

/// File name of the full-case STEP written by [`CaseGenerator::export_bundle`].
pub const BUNDLE_STEP_NAME: &str = "enclosure.step";
/// File name of the full-case STL written by [`CaseGenerator::export_bundle`].
pub const BUNDLE_STL_NAME: &str = "enclosure.stl";

/// Paths written by [`CaseGenerator::export_bundle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    pub step: PathBuf,
    pub stl: PathBuf,
}

pub struct CaseGenerator<'a, K: Kernel = PrismKernel> {
    schema: &'a FissionSchema,
    layout: CaseLayout,
    kernel: K,
}

impl<'a> CaseGenerator<'a, PrismKernel> {
    pub fn new(schema: &'a FissionSchema) -> Self {
        Self::with_kernel(schema, PrismKernel::new())
    }
}

impl<'a, K: Kernel> CaseGenerator<'a, K> {
    pub fn with_kernel(schema: &'a FissionSchema, kernel: K) -> Self {
        Self {
            schema,
            layout: CaseLayout::new(schema, CaseParams::default()),
            kernel,
        }
    }

    /// Replace the construction margins.
    pub fn with_params(mut self, params: CaseParams) -> Self {
        self.layout = CaseLayout::new(self.schema, params);
        self
    }

    pub fn layout(&self) -> &CaseLayout {
        &self.layout
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn schema(&self) -> &FissionSchema {
        self.schema
    }

    /// Build the complete case. The split type does not change the solid;
    /// the halves are always cut at `split_z`.
    #[instrument(skip(self), fields(project = %self.schema.project))]
    pub fn generate(&self) -> Result<K::Solid, CaseError> {
        let k = &self.kernel;
        let l = &self.layout;
        if l.split != SplitType::Horizontal {
            warn!(split = %l.split, split_z = l.split_z, "only horizontal splits are produced");
        }

        let outer = k.make_box([0.0, 0.0, l.outer_height / 2.0], l.outer_size())?;
        let cavity = k.make_box(
            [0.0, 0.0, l.cavity_center_z()],
            [l.inner_width, l.inner_length, l.inner_height],
        )?;
        let mut case = k.boolean_subtract(&outer, &cavity)?;

        for post in &l.posts {
            let [x, y] = post.center;
            let z = post.center_z();
            let body = k.make_cylinder([x, y, z], post.post_radius, post.height)?;
            case = k.boolean_union(&case, &body)?;
            let bore = k.make_cylinder([x, y, z], post.bore_radius, post.bore_length)?;
            case = k.boolean_subtract(&case, &bore)?;
            debug!(x, y, radius = post.post_radius, "mount post added");
        }

        for cutout in &l.cutouts {
            let cutter = k.make_box(cutout.center, cutout.size)?;
            case = k.boolean_subtract(&case, &cutter)?;
            debug!(connector = %cutout.label, edge = %cutout.edge, "connector cutout added");
        }
        for label in &l.unplaced_connectors {
            debug!(connector = %label, "connector has no edge, no cutout");
        }

        info!(
            posts = l.posts.len(),
            cutouts = l.cutouts.len(),
            outer_width = l.outer_width,
            outer_length = l.outer_length,
            outer_height = l.outer_height,
            "case generated"
        );
        Ok(case)
    }

    /// The part of the case above the split plane.
    pub fn generate_top(&self) -> Result<K::Solid, CaseError> {
        let case = self.generate()?;
        Ok(self.kernel.split(&case, self.layout.split_z, SplitKeep::Above)?)
    }

    /// The part of the case below the split plane.
    pub fn generate_bottom(&self) -> Result<K::Solid, CaseError> {
        let case = self.generate()?;
        Ok(self.kernel.split(&case, self.layout.split_z, SplitKeep::Below)?)
    }

    #[instrument(skip(self))]
    pub fn export_step(&self, path: &Path) -> Result<(), CaseError> {
        let case = self.generate()?;
        let text = self.kernel.export_step(&case, &self.schema.project)?;
        std::fs::write(path, text).map_err(|source| CaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "STEP written");
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn export_stl(&self, path: &Path) -> Result<(), CaseError> {
        let case = self.generate()?;
        self.write_stl(&case, path)
    }

    /// Write the top and bottom shells as separate STL files.
    #[instrument(skip(self))]
    pub fn export_split_stl(&self, top_path: &Path, bottom_path: &Path) -> Result<(), CaseError> {
        let case = self.generate()?;
        let z = self.layout.split_z;
        let top = self.kernel.split(&case, z, SplitKeep::Above)?;
        let bottom = self.kernel.split(&case, z, SplitKeep::Below)?;
        self.write_stl(&top, top_path)?;
        self.write_stl(&bottom, bottom_path)
    }

    /// Write `enclosure.step` and `enclosure.stl` into `dir`, creating it
    /// if needed.
    #[instrument(skip(self))]
    pub fn export_bundle(&self, dir: &Path) -> Result<ExportBundle, CaseError> {
        std::fs::create_dir_all(dir).map_err(|source| CaseError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let bundle = ExportBundle {
            step: dir.join(BUNDLE_STEP_NAME),
            stl: dir.join(BUNDLE_STL_NAME),
        };
        self.export_step(&bundle.step)?;
        self.export_stl(&bundle.stl)?;
        Ok(bundle)
    }

    fn write_stl(&self, solid: &K::Solid, path: &Path) -> Result<(), CaseError> {
        let mesh = self.kernel.tessellate(solid)?;
        save_stl(&mesh, path)?;
        info!(
            path = %path.display(),
            triangles = mesh.triangle_count(),
            "STL written"
        );
        Ok(())
    }
}
