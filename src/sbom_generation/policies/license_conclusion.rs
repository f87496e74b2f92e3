use crate::sbom_generation::domain::{NOASSERTION, NONE};

/// LicenseConclusion policy for deciding the license values of a scanned file
///
/// Rules:
/// 1. A file whose text matches a corpus license records that license both as
///    the license found in the file and as its concluded license
/// 2. A file without a match records `NONE` as the license found and inherits
///    the concluded license of the enclosing directory
/// 3. Without a directory license the concluded value is `NOASSERTION`
pub struct LicenseConclusion;

/// License values decided for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLicenses {
    pub info_in_file: String,
    pub concluded: String,
}

impl LicenseConclusion {
    /// Applies the rules to a classification result
    ///
    /// # Arguments
    /// * `found` - License id matched in the file, if any
    /// * `directory_license` - License concluded for the enclosing directory
    pub fn for_file(found: Option<&str>, directory_license: Option<&str>) -> FileLicenses {
        match found {
            Some(id) => FileLicenses {
                info_in_file: id.to_string(),
                concluded: id.to_string(),
            },
            None => FileLicenses {
                info_in_file: NONE.to_string(),
                concluded: directory_license.unwrap_or(NOASSERTION).to_string(),
            },
        }
    }

    /// Concluded license of a package: the directory license, `NOASSERTION`
    /// when none was found
    pub fn for_package(directory_license: Option<&str>) -> String {
        directory_license.unwrap_or(NOASSERTION).to_string()
    }
}
