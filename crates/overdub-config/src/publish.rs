use serde::Deserialize;

/// How rendered videos are published
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// Prepended to the rendered file name to form the object key
    #[serde(default = "default_object_prefix")]
    pub object_prefix: String,
    /// Grant public read on each uploaded object.
    ///
    /// Disable for buckets with uniform bucket-level access, where object
    /// ACLs are rejected and readability comes from the bucket policy.
    #[serde(default = "default_make_public")]
    pub make_public: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            object_prefix: default_object_prefix(),
            make_public: default_make_public(),
        }
    }
}

fn default_object_prefix() -> String {
    "output_video_".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_make_public() -> bool {
    true
}
