//! Package assembly, import reconciliation and the legacy bundle adapter.

pub mod assemble;
pub mod legacy;
pub mod library;
pub mod manifest;
pub mod paths;
pub mod reconcile;

pub use assemble::{PackageAssembler, PackageFile, PackageMetadata, StoredPackage, archive_name, load_package};
pub use legacy::{from_legacy_bundle, to_legacy_bundle};
pub use library::{DocumentTransformer, Iteration, SkillLibrary, StaticRevision, StoredSkill};
pub use manifest::{ManifestEntry, write_files};
pub use paths::{Scope, StoragePath, normalize_prefix, slugify};
pub use reconcile::{ImportReconciler, ImportResult, ImportedSkill};
