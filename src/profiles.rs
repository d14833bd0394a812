//! Named sync profiles persisted as a JSON document

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SyncProfile;
use crate::error::ProfileError;
use crate::logging::*;

/// Name of the profile created when no profile file exists yet
pub const DEFAULT_PROFILE: &str = "default";

/// `$HOME/.config/dirsync/profiles.json`, if a home directory is known
pub fn default_profiles_path() -> Option<PathBuf> {
	env::var_os("HOME")
		.or_else(|| env::var_os("USERPROFILE"))
		.map(|home| PathBuf::from(home).join(".config").join("dirsync").join("profiles.json"))
}

/// Profile collection bound to one file on disk
#[derive(Debug, Clone)]
pub struct ProfileStore {
	path: PathBuf,
	profiles: BTreeMap<String, SyncProfile>,
}

impl ProfileStore {
	/// Load the store at `path`
	///
	/// A missing file yields a store with a single empty `default` profile.
	/// Comments and trailing commas in the document are tolerated.
	pub fn load(path: impl Into<PathBuf>) -> Result<Self, ProfileError> {
		let path = path.into();

		if !path.exists() {
			debug!("No profile file at {}, starting with defaults", path.display());
			return Ok(Self::with_default(path));
		}

		let contents = fs::read_to_string(&path)
			.map_err(|e| ProfileError::LoadFailed { path: path.clone(), source: e })?;

		let profiles: BTreeMap<String, SyncProfile> =
			json5::from_str(&contents).map_err(|e| ProfileError::Corrupted {
				path: path.clone(),
				message: e.to_string(),
			})?;

		if profiles.is_empty() {
			return Ok(Self::with_default(path));
		}

		debug!("Loaded {} profiles from {}", profiles.len(), path.display());
		Ok(ProfileStore { path, profiles })
	}

	fn with_default(path: PathBuf) -> Self {
		let mut profiles = BTreeMap::new();
		profiles.insert(DEFAULT_PROFILE.to_string(), SyncProfile::default());
		ProfileStore { path, profiles }
	}

	/// Write the store back to its file, creating parent directories
	pub fn save(&self) -> Result<(), ProfileError> {
		if let Some(parent) = self.path.parent() {
			if !parent.as_os_str().is_empty() && !parent.exists() {
				fs::create_dir_all(parent).map_err(|e| ProfileError::SaveFailed {
					path: self.path.clone(),
					source: Box::new(e),
				})?;
			}
		}

		let json = serde_json::to_string_pretty(&self.profiles)
			.map_err(|e| ProfileError::SaveFailed { path: self.path.clone(), source: Box::new(e) })?;

		fs::write(&self.path, json)
			.map_err(|e| ProfileError::SaveFailed { path: self.path.clone(), source: Box::new(e) })?;

		info!("Saved {} profiles to {}", self.profiles.len(), self.path.display());
		Ok(())
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn get(&self, name: &str) -> Result<&SyncProfile, ProfileError> {
		self.profiles.get(name).ok_or_else(|| ProfileError::NotFound { name: name.to_string() })
	}

	/// Profile names in sorted order
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.profiles.keys().map(|k| k.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &SyncProfile)> {
		self.profiles.iter()
	}

	pub fn len(&self) -> usize {
		self.profiles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.profiles.is_empty()
	}

	/// Add or replace a profile; returns the previous one with that name
	pub fn insert(&mut self, name: impl Into<String>, profile: SyncProfile) -> Option<SyncProfile> {
		self.profiles.insert(name.into(), profile)
	}

	/// Remove a profile
	///
	/// The last remaining profile cannot be removed.
	pub fn remove(&mut self, name: &str) -> Result<SyncProfile, ProfileError> {
		if !self.profiles.contains_key(name) {
			return Err(ProfileError::NotFound { name: name.to_string() });
		}
		if self.profiles.len() == 1 {
			return Err(ProfileError::LastProfile { name: name.to_string() });
		}
		self.profiles.remove(name).ok_or_else(|| ProfileError::NotFound { name: name.to_string() })
	}
}


// vim: ts=4
