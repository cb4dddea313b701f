/// Operating system family, which decides the HTTP client binary name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Other,
}

impl HostOs {
    pub fn detect() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else {
            HostOs::Other
        }
    }

    pub fn default_client(&self) -> &'static str {
        match self {
            HostOs::Windows => "curl.exe",
            HostOs::Other => "curl",
        }
    }
}
