//! Bash dialect
//!
//! The script is assembled from four independently generated parts:
//!
//! 1. `export` lines for the build environment
//! 2. pre-build: fetch or clone the repository and check out the commit
//! 3. the job's own commands
//! 4. post-build: collect, archive and upload artifacts
//!
//! Parts 2-4 are each passed to `eval` as a single escaped word, so whatever they
//! contain is re-parsed in isolation from the outer script. `set -eo pipefail`
//! at the top makes the first failing command abort the whole job.

use super::escape::shell_escape;
use super::types::{FeaturesInfo, Shell, ShellError, ShellScript, ShellScriptInfo, ShellType};
use super::writer::ScriptWriter;
use crate::job::{
    build_variables, clean_path, ArtifactRule, EnvVariable, JobDescription, ARTIFACTS_OPTION,
};
use tracing::{debug, warn};

pub const ARTIFACTS_MANIFEST: &str = "artifacts.files";
pub const ARTIFACTS_ARCHIVE: &str = "artifacts.tgz";
pub const ARTIFACTS_UPLOAD_LOG: &str = "artifacts.upload.log";
pub const BUILD_TOKEN_HEADER: &str = "BUILD-TOKEN";

const SHEBANG: &str = "#!/usr/bin/env bash";
const BASH_PATH: &str = "/bin/bash";

pub struct BashShell {
    supported_options: Vec<&'static str>,
}

impl BashShell {
    pub fn new() -> Self {
        Self {
            supported_options: vec![ARTIFACTS_OPTION],
        }
    }

    fn variables(&self, info: &ShellScriptInfo<'_>) -> Vec<EnvVariable> {
        build_variables(info.job, &info.job.full_project_dir(), &info.environment)
    }

    fn generate_exports(&self, variables: &[EnvVariable]) -> String {
        let mut w = ScriptWriter::new();
        for variable in variables {
            w.command_format(&format!(
                "export {}={}",
                shell_escape(&variable.name),
                shell_escape(&variable.value)
            ));
        }
        w.into_string()
    }

    fn write_clone(&self, w: &mut ScriptWriter, job: &JobDescription, project_dir: &str) {
        w.echo_colored("Cloning repository...");
        w.command("rm", &["-rf", project_dir]);
        w.command("mkdir", &["-p", project_dir]);
        w.command("git", &["clone", job.repo_url.as_str(), project_dir]);
        w.command("cd", &[project_dir]);
    }

    fn write_fetch(&self, w: &mut ScriptWriter, job: &JobDescription, project_dir: &str) {
        let git_dir = if project_dir.is_empty() {
            ".git".to_string()
        } else {
            clean_path(&format!("{}/.git", project_dir))
        };

        w.if_directory(&git_dir);
        w.echo_colored("Fetching changes...");
        w.command("cd", &[project_dir]);
        w.command("git", &["clean", "-ffdx"]);
        w.command("git", &["reset", "--hard"]);
        w.command("git", &["remote", "set-url", "origin", job.repo_url.as_str()]);
        w.command("git", &["fetch", "origin"]);
        w.else_branch();
        self.write_clone(w, job, project_dir);
        w.end_if();
    }

    fn write_checkout(&self, w: &mut ScriptWriter, job: &JobDescription) {
        w.echo_colored(&format!(
            "Checking out {} as {}...",
            job.short_sha(),
            job.ref_name
        ));
        w.command("git", &["checkout", job.sha.as_str()]);
    }

    fn generate_pre_build(&self, info: &ShellScriptInfo<'_>) -> String {
        let job = info.job;
        let project_dir = job.full_project_dir();
        let mut w = ScriptWriter::new();

        // $(hostname) must reach the executing shell unquoted; the label must not.
        match job.hostname.as_deref().filter(|h| !h.is_empty()) {
            Some(hostname) => w.command_format(&format!(
                "echo \"Running on $(hostname) via \"{}",
                shell_escape(&format!("{}...", hostname))
            )),
            None => w.command_format("echo \"Running on $(hostname)...\""),
        }

        if job.allow_git_fetch {
            debug!(job_id = job.id, "Generating incremental fetch");
            self.write_fetch(&mut w, job, &project_dir);
        } else {
            debug!(job_id = job.id, "Generating fresh clone");
            self.write_clone(&mut w, job, &project_dir);
        }

        self.write_checkout(&mut w, job);
        w.into_string()
    }

    fn generate_commands(&self, info: &ShellScriptInfo<'_>) -> String {
        let job = info.job;
        let verbose = !job.runner.verbose_disabled();
        let mut w = ScriptWriter::new();

        w.command("cd", &[job.full_project_dir()]);

        for line in job.commands.trim().split('\n') {
            let command = line.trim();
            if verbose {
                if command.is_empty() {
                    w.command::<&str>("echo", &[]);
                } else {
                    w.echo_colored(&format!("$ {}", command));
                }
            }
            w.command_format(command);
        }

        w.into_string()
    }

    fn write_find_artifacts(&self, w: &mut ScriptWriter, rule: &ArtifactRule) {
        let filters: Vec<String> = rule
            .find_patterns()
            .iter()
            .map(|pattern| format!("-wholename {}", shell_escape(pattern)))
            .collect();

        if !filters.is_empty() {
            w.command_format(&format!(
                "find . '(' {} ')' -type f >> {}",
                filters.join(" -or "),
                shell_escape(ARTIFACTS_MANIFEST)
            ));
        }

        if rule.untracked {
            w.command_format(&format!(
                "git ls-files -o >> {}",
                shell_escape(ARTIFACTS_MANIFEST)
            ));
        }
    }

    fn generate_post_build(&self, info: &ShellScriptInfo<'_>) -> String {
        let job = info.job;
        let mut w = ScriptWriter::new();

        w.command("cd", &[job.full_project_dir()]);

        if let Some(rule) = ArtifactRule::from_options(&job.options) {
            debug!(
                job_id = job.id,
                paths = rule.paths.len(),
                untracked = rule.untracked,
                "Generating artifact manifest"
            );
            self.write_find_artifacts(&mut w, &rule);
        }

        w.if_file(ARTIFACTS_MANIFEST);
        w.echo_colored("Archiving artifacts...");
        w.command(
            "tar",
            &["-zcv", "-T", ARTIFACTS_MANIFEST, "-f", ARTIFACTS_ARCHIVE],
        );
        w.end_if();

        w.if_file(ARTIFACTS_ARCHIVE);
        w.echo_colored("Uploading artifacts...");
        w.command("du", &["-h", ARTIFACTS_ARCHIVE]);
        w.command(
            "curl",
            &[
                "-s".to_string(),
                "-S".to_string(),
                "--fail".to_string(),
                "--retry".to_string(),
                "3".to_string(),
                "-X".to_string(),
                "POST".to_string(),
                "-#".to_string(),
                "-o".to_string(),
                ARTIFACTS_UPLOAD_LOG.to_string(),
                "-H".to_string(),
                format!("{}: {}", BUILD_TOKEN_HEADER, job.token),
                "-F".to_string(),
                format!("file=@{}", ARTIFACTS_ARCHIVE),
                job.artifacts_upload_url(),
            ],
        );
        w.end_if();

        w.into_string()
    }

    fn warn_unsupported_options(&self, job: &JobDescription) {
        for key in job.options.keys() {
            if !self.supported_options.iter().any(|option| option == key) {
                warn!(job_id = job.id, option = %key, "Ignoring option not supported by bash");
            }
        }
    }

    fn invocation(&self, info: &ShellScriptInfo<'_>) -> (String, Vec<String>) {
        let login = info.shell_type == ShellType::Login;

        match &info.user {
            Some(user) => {
                let mut arguments = vec!["--shell".to_string(), BASH_PATH.to_string()];
                if login {
                    arguments.push("--login".to_string());
                }
                arguments.push(user.clone());
                ("su".to_string(), arguments)
            }
            None => {
                let arguments = if login {
                    vec!["--login".to_string()]
                } else {
                    Vec::new()
                };
                ("bash".to_string(), arguments)
            }
        }
    }
}

impl Default for BashShell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell for BashShell {
    fn name(&self) -> &str {
        "bash"
    }

    fn features(&self) -> FeaturesInfo {
        FeaturesInfo { artifacts: true }
    }

    fn supported_options(&self) -> &[&str] {
        &self.supported_options
    }

    fn is_default(&self) -> bool {
        cfg!(not(windows))
    }

    fn generate_script(&self, info: &ShellScriptInfo<'_>) -> Result<ShellScript, ShellError> {
        self.warn_unsupported_options(info.job);

        let variables = self.variables(info);

        let mut script = String::new();
        script.push_str(SHEBANG);
        script.push_str("\n\n");
        script.push_str(&self.generate_exports(&variables));
        script.push_str("set -eo pipefail\n");
        script.push_str(&format!(": | eval {}\n", shell_escape(&self.generate_pre_build(info))));
        script.push_str("echo\n");
        script.push_str(&format!(": | eval {}\n", shell_escape(&self.generate_commands(info))));
        script.push_str("echo\n");
        script.push_str(&format!(": | eval {}\n", shell_escape(&self.generate_post_build(info))));

        let (command, arguments) = self.invocation(info);
        debug!(
            job_id = info.job.id,
            bytes = script.len(),
            command = %command,
            "Generated bash script"
        );

        Ok(ShellScript {
            script,
            environment: variables,
            command,
            arguments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::RunnerSettings;
    use serde_json::json;
    use yare::parameterized;

    const SHA: &str = "abcdef1234567890abcdef1234567890abcdef12";

    fn job() -> JobDescription {
        JobDescription {
            id: 1,
            repo_url: "https://example/repo.git".to_string(),
            sha: SHA.to_string(),
            ref_name: "main".to_string(),
            commands: "echo build".to_string(),
            project_dir: "/builds/project".to_string(),
            token: "tok".to_string(),
            runner: RunnerSettings {
                url: "https://ci.example.com".to_string(),
                disable_verbose: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_clone_when_fetch_disallowed() {
        let job = job();
        let pre = BashShell::new().generate_pre_build(&ShellScriptInfo::new(&job));

        assert_eq!(
            pre,
            "echo \"Running on $(hostname)...\"\n\
             echo '\x1b[32;1mCloning repository...\x1b[0;m'\n\
             rm -rf /builds/project\n\
             mkdir -p /builds/project\n\
             git clone https://example/repo.git /builds/project\n\
             cd /builds/project\n\
             echo '\x1b[32;1mChecking out abcdef12 as main...\x1b[0;m'\n\
             git checkout abcdef1234567890abcdef1234567890abcdef12\n"
        );
    }

    #[test]
    fn test_fetch_branch_when_fetch_allowed() {
        let mut job = job();
        job.allow_git_fetch = true;
        let pre = BashShell::new().generate_pre_build(&ShellScriptInfo::new(&job));

        let lines: Vec<&str> = pre.lines().collect();
        let if_idx = lines
            .iter()
            .position(|l| *l == "if [[ -d /builds/project/.git ]]; then")
            .unwrap();
        let else_idx = lines.iter().position(|l| *l == "else").unwrap();
        let fi_idx = lines.iter().position(|l| *l == "fi").unwrap();
        let fetch_idx = lines.iter().position(|l| *l == "git fetch origin").unwrap();
        let clone_idx = lines
            .iter()
            .position(|l| l.starts_with("git clone"))
            .unwrap();

        assert!(if_idx < fetch_idx && fetch_idx < else_idx);
        assert!(else_idx < clone_idx && clone_idx < fi_idx);
        assert!(lines.contains(&"git clean -ffdx"));
        assert!(lines.contains(&"git reset --hard"));
        assert!(lines.contains(&"git remote set-url origin https://example/repo.git"));
        assert_eq!(lines.last(), Some(&"git checkout abcdef1234567890abcdef1234567890abcdef12"));
    }

    #[parameterized(
        absolute = { "/builds/project", "if [[ -d /builds/project/.git ]]; then" },
        trailing_slash = { "/builds/project/", "if [[ -d /builds/project/.git ]]; then" },
        relative = { "builds/./project", "if [[ -d builds/project/.git ]]; then" },
        empty = { "", "if [[ -d .git ]]; then" },
        root = { "/", "if [[ -d /.git ]]; then" },
    )]
    fn test_fetch_checks_git_dir_inside_project(project_dir: &str, expected: &str) {
        let mut job = job();
        job.allow_git_fetch = true;
        job.project_dir = project_dir.to_string();
        let pre = BashShell::new().generate_pre_build(&ShellScriptInfo::new(&job));

        assert_eq!(pre.lines().nth(1), Some(expected));
    }

    #[test]
    fn test_hostname_label_is_escaped() {
        let mut job = job();
        job.hostname = Some("docker $(rm -rf /)".to_string());
        let pre = BashShell::new().generate_pre_build(&ShellScriptInfo::new(&job));

        assert_eq!(
            pre.lines().next(),
            Some("echo \"Running on $(hostname) via \"'docker $(rm -rf /)...'")
        );
    }

    #[test]
    fn test_checkout_uses_full_sha() {
        let mut job = job();
        job.sha = "abcdef1234567890".to_string();
        let pre = BashShell::new().generate_pre_build(&ShellScriptInfo::new(&job));

        assert!(pre.contains("git checkout abcdef1234567890\n"));
        assert!(pre.contains("Checking out abcdef12 as main..."));
        assert!(!pre.contains("Checking out abcdef1234567890"));
    }

    #[test]
    fn test_commands_with_narration() {
        let mut job = job();
        job.commands = "echo hi\n\nls".to_string();
        let commands = BashShell::new().generate_commands(&ShellScriptInfo::new(&job));

        assert_eq!(
            commands,
            "cd /builds/project\n\
             echo '\x1b[32;1m$ echo hi\x1b[0;m'\n\
             echo hi\n\
             echo\n\
             \n\
             echo '\x1b[32;1m$ ls\x1b[0;m'\n\
             ls\n"
        );
    }

    #[test]
    fn test_commands_without_narration() {
        let mut job = job();
        job.commands = "  echo hi  \n\nls\n".to_string();
        job.runner.disable_verbose = Some(true);
        let commands = BashShell::new().generate_commands(&ShellScriptInfo::new(&job));

        assert_eq!(commands, "cd /builds/project\necho hi\n\nls\n");
    }

    #[test]
    fn test_commands_are_emitted_verbatim() {
        let mut job = job();
        job.commands = "make 2>&1 | tee \"$LOG\"".to_string();
        job.runner.disable_verbose = Some(true);
        let commands = BashShell::new().generate_commands(&ShellScriptInfo::new(&job));

        assert!(commands.ends_with("make 2>&1 | tee \"$LOG\"\n"));
    }

    #[test]
    fn test_post_build_without_artifacts_option() {
        let job = job();
        let post = BashShell::new().generate_post_build(&ShellScriptInfo::new(&job));

        assert!(!post.contains("find ."));
        assert!(!post.contains("git ls-files"));
        assert!(post.starts_with("cd /builds/project\nif [[ -e artifacts.files ]]; then\n"));
    }

    #[test]
    fn test_post_build_with_paths_and_untracked() {
        let mut job = job();
        job.options.insert(
            "artifacts".to_string(),
            json!({ "paths": ["log/*.txt", "bin/app"], "untracked": true }),
        );
        let post = BashShell::new().generate_post_build(&ShellScriptInfo::new(&job));

        assert!(post.contains(
            "find . '(' -wholename './log/*.txt' -or -wholename ./bin/app ')' -type f >> artifacts.files\n"
        ));
        assert!(post.contains("git ls-files -o >> artifacts.files\n"));
    }

    #[test]
    fn test_post_build_untracked_only() {
        let mut job = job();
        job.options
            .insert("artifacts".to_string(), json!({ "untracked": true }));
        let post = BashShell::new().generate_post_build(&ShellScriptInfo::new(&job));

        assert!(!post.contains("find ."));
        assert!(post.contains("git ls-files -o >> artifacts.files\n"));
    }

    #[test]
    fn test_post_build_archive_and_upload() {
        let mut job = job();
        job.id = 99;
        job.token = "secret token".to_string();
        let post = BashShell::new().generate_post_build(&ShellScriptInfo::new(&job));

        assert!(post.contains("tar -zcv -T artifacts.files -f artifacts.tgz\n"));
        assert!(post.contains("if [[ -e artifacts.tgz ]]; then\n"));
        assert!(post.contains("du -h artifacts.tgz\n"));
        assert!(post.contains(
            "curl -s -S --fail --retry 3 -X POST '-#' -o artifacts.upload.log \
             -H 'BUILD-TOKEN: secret token' -F file=@artifacts.tgz \
             https://ci.example.com/api/v1/builds/99/artifacts\n"
        ));
        assert!(post.ends_with("fi\n"));
    }

    #[test]
    fn test_exports_preserve_order_and_escape_values() {
        let shell = BashShell::new();
        let exports = shell.generate_exports(&[
            EnvVariable::new("A", "1"),
            EnvVariable::new("B", "two words"),
            EnvVariable::new("A", "it's"),
        ]);

        assert_eq!(
            exports,
            "export A=1\nexport B='two words'\nexport A='it'\"'\"'s'\n"
        );
    }

    #[test]
    fn test_script_structure() {
        let job = job();
        let result = BashShell::new()
            .generate_script(&ShellScriptInfo::new(&job))
            .unwrap();

        let lines: Vec<&str> = result.script.lines().collect();
        assert_eq!(lines[0], "#!/usr/bin/env bash");
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with("export "));
        assert!(result.script.contains("\nset -eo pipefail\n: | eval "));
        assert_eq!(result.script.matches("\necho\n: | eval ").count(), 2);
        assert_eq!(result.environment.len(), 13);
    }

    #[test]
    fn test_phase_tokens_round_trip() {
        let job = job();
        let shell = BashShell::new();
        let info = ShellScriptInfo::new(&job);
        let script = shell.generate_script(&info).unwrap().script;

        let expected = format!(": | eval {}\n", shell_escape(&shell.generate_commands(&info)));
        assert!(script.contains(&expected));
    }

    #[test]
    fn test_invocation_variants() {
        let job = job();
        let shell = BashShell::new();
        let mut info = ShellScriptInfo::new(&job);

        assert_eq!(shell.invocation(&info), ("bash".to_string(), vec![]));

        info.shell_type = ShellType::Login;
        assert_eq!(
            shell.invocation(&info),
            ("bash".to_string(), vec!["--login".to_string()])
        );

        info.user = Some("builder".to_string());
        assert_eq!(
            shell.invocation(&info),
            (
                "su".to_string(),
                vec!["--shell", "/bin/bash", "--login", "builder"]
                    .into_iter()
                    .map(String::from)
                    .collect()
            )
        );

        info.shell_type = ShellType::Normal;
        assert_eq!(
            shell.invocation(&info),
            (
                "su".to_string(),
                vec!["--shell", "/bin/bash", "builder"]
                    .into_iter()
                    .map(String::from)
                    .collect()
            )
        );
    }

    #[test]
    fn test_features_and_options() {
        let shell = BashShell::new();
        assert_eq!(shell.name(), "bash");
        assert!(shell.features().artifacts);
        assert_eq!(shell.supported_options(), &["artifacts"]);
        assert_eq!(shell.is_default(), cfg!(not(windows)));
    }
}
