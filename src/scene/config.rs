//! Scene configuration
//!
//! The three scene variants differ only in data: which registry columns are
//! shown, how the process ends, and how large the panels are. Everything a
//! scene displays is listed here so that a JSON file can describe a new
//! variant without touching the script.

use super::constants::{PROCESS_NAME, PROCESS_PID, WRITTEN_VALUE};
use crate::errors::Result;
use crate::memory::heap::HeapFixture;
use crate::memory::search::SearchFixture;
use crate::memory::stack::StackFixture;
use crate::registry::RegistrySchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// How the scene's process goes away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminationMode {
    /// `delete` runs, `main()` returns and the process exits normally
    ExitProcess,
    /// The process crashes and the OS reclaims everything it owned
    TerminateProcess,
}

/// Scale factors applied to panel groups about their centers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelScale {
    /// Code and disassembly panels
    pub code: f32,
    /// Function, OS and registry panels
    pub os: f32,
    /// Stack and heap panels
    pub memory: f32,
}

impl Default for PanelScale {
    fn default() -> Self {
        PanelScale {
            code: 1.0,
            os: 1.0,
            memory: 1.0,
        }
    }
}

/// The process the scene follows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub name: String,
    pub pid: String,
}

impl Default for ProcessInfo {
    fn default() -> Self {
        ProcessInfo {
            name: PROCESS_NAME.to_string(),
            pid: PROCESS_PID.to_string(),
        }
    }
}

/// Built-in scene variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SceneName {
    /// Legacy registry columns, normal exit
    HeapBasics,
    /// VAD-style registry columns, normal exit
    VadRegistry,
    /// VAD-style registry columns, process crash and OS cleanup
    CrashCleanup,
}

impl SceneName {
    pub const ALL: [SceneName; 3] = [
        SceneName::HeapBasics,
        SceneName::VadRegistry,
        SceneName::CrashCleanup,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneName::HeapBasics => "heap-basics",
            SceneName::VadRegistry => "vad-registry",
            SceneName::CrashCleanup => "crash-cleanup",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SceneName::HeapBasics => "new/write/delete with a simple OS region registry",
            SceneName::VadRegistry => "the same program, registry drawn as Windows VAD entries",
            SceneName::CrashCleanup => "the process crashes; the OS reclaims its memory",
        }
    }
}

impl fmt::Display for SceneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything that distinguishes one scene from another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub title: String,
    pub registry_schema: RegistrySchema,
    pub termination: TerminationMode,
    pub scale: PanelScale,
    pub process: ProcessInfo,
    pub code_lines: Vec<String>,
    pub disasm_lines: Vec<String>,
    pub api_functions: Vec<String>,
    pub stack: StackFixture,
    pub heap: HeapFixture,
    pub search: SearchFixture,
    pub written_value: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            title: SceneName::HeapBasics.name().to_string(),
            registry_schema: RegistrySchema::Legacy,
            termination: TerminationMode::ExitProcess,
            scale: PanelScale::default(),
            process: ProcessInfo::default(),
            code_lines: to_strings(&[
                "int main() {",
                "    int* ptr = new int;",
                "    *ptr = 42;",
                "    delete ptr;",
                "}",
            ]),
            disasm_lines: to_strings(&["mov rax, [rsp + addr_ptr]", "mov [rax], 42"]),
            api_functions: to_strings(&[
                "VirtualAlloc()",
                "HeapAlloc()",
                "HeapFree()",
                "VirtualFree()",
            ]),
            stack: StackFixture::default(),
            heap: HeapFixture::default(),
            search: SearchFixture::default(),
            written_value: WRITTEN_VALUE.to_string(),
        }
    }
}

impl SceneConfig {
    pub fn preset(name: SceneName) -> Self {
        let base = SceneConfig {
            title: name.name().to_string(),
            ..SceneConfig::default()
        };

        match name {
            SceneName::HeapBasics => base,
            SceneName::VadRegistry => SceneConfig {
                registry_schema: RegistrySchema::Vad,
                scale: PanelScale {
                    code: 0.95,
                    os: 0.95,
                    memory: 0.95,
                },
                ..base
            },
            SceneName::CrashCleanup => SceneConfig {
                registry_schema: RegistrySchema::Vad,
                termination: TerminationMode::TerminateProcess,
                scale: PanelScale {
                    code: 0.9,
                    ..PanelScale::default()
                },
                ..base
            },
        }
    }

    /// Parse a JSON description; missing fields come from the `heap-basics` preset
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::debug!("loaded scene config '{}' from {}", config.title, path.display());
        Ok(config)
    }

    /// `app.exe (PID 1234)`
    pub fn process_label(&self) -> String {
        format!("{} ({})", self.process.name, self.process.pid)
    }
}

fn to_strings(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}
