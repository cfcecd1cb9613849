//! Integration tests for the aloe-support binaries
//!
//! External tools are replaced by small shell scripts wired in through a
//! temporary config file.

#[cfg(unix)]
mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use serial_test::serial;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn tool(name: &str, config: &Path) -> Command {
        let mut cmd = match name {
            "aloe-addr2line" => cargo_bin_cmd!("aloe-addr2line"),
            "aloe-clangd" => cargo_bin_cmd!("aloe-clangd"),
            "aloe-initrd" => cargo_bin_cmd!("aloe-initrd"),
            _ => cargo_bin_cmd!("aloe-qemu"),
        };
        cmd.arg("--no-local").arg("--config").arg(config);
        cmd
    }

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, body).unwrap();
        path
    }

    /// chariot stand-in: `path` prints `<dir>/out`, `build` succeeds quietly
    fn fake_chariot(dir: &Path) -> PathBuf {
        script(
            dir,
            "chariot",
            &format!(
                "if [ \"$3\" = path ]; then echo {}/out; fi",
                dir.display()
            ),
        )
    }

    #[test]
    #[serial]
    fn addr2line_usage_without_address() {
        cargo_bin_cmd!("aloe-addr2line")
            .assert()
            .code(1)
            .stdout(
                predicate::str::contains("Usage").and(predicate::str::contains("aloe-addr2line")),
            );
    }

    #[test]
    #[serial]
    fn addr2line_forwards_normalised_address() {
        let temp = TempDir::new().unwrap();
        let chariot = fake_chariot(temp.path());
        let addr2line = script(temp.path(), "addr2line", "echo \"$@\"");
        let config = write_config(
            temp.path(),
            &format!(
                "[chariot]\nprogram = \"{}\"\ncache_path = \"{}/cache\"\n\n[symbols]\nprogram = \"{}\"\n",
                chariot.display(),
                temp.path().display(),
                addr2line.display()
            ),
        );
        let expected = format!(
            "-fai -e {}/out/usr/bin/aloe.elf 0xdeadbeef",
            temp.path().display()
        );

        for input in ["DEADBEEF", "0xdeadbeef"] {
            tool("aloe-addr2line", &config)
                .arg(input)
                .assert()
                .success()
                .stdout(predicate::str::contains(expected.clone()));
        }
    }

    #[test]
    #[serial]
    fn addr2line_relays_tool_exit_code() {
        let temp = TempDir::new().unwrap();
        let chariot = fake_chariot(temp.path());
        let addr2line = script(temp.path(), "addr2line", "exit 3");
        let config = write_config(
            temp.path(),
            &format!(
                "[chariot]\nprogram = \"{}\"\n\n[symbols]\nprogram = \"{}\"\n",
                chariot.display(),
                addr2line.display()
            ),
        );

        tool("aloe-addr2line", &config).arg("1000").assert().code(3);
    }

    #[test]
    #[serial]
    fn addr2line_rejects_non_hex() {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), "");

        tool("aloe-addr2line", &config)
            .arg("xyz")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Invalid address"));
    }

    #[test]
    #[serial]
    fn clangd_usage_with_one_argument() {
        cargo_bin_cmd!("aloe-clangd")
            .arg("package/aloe")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Usage").and(predicate::str::contains("aloe-clangd")));
    }

    #[test]
    #[serial]
    fn clangd_builds_sandbox_command() {
        let temp = TempDir::new().unwrap();
        let chariot = script(temp.path(), "chariot", "printf '%s\\n' \"$@\"");
        let config = write_config(
            temp.path(),
            &format!(
                "[chariot]\nprogram = \"{}\"\ncache_path = \"/cache\"\n",
                chariot.display()
            ),
        );
        let sources = temp.path().join("src");
        fs::create_dir(&sources).unwrap();
        let cwd = sources.canonicalize().unwrap();

        tool("aloe-clangd", &config)
            .current_dir(&sources)
            .args(["--project-root", "/project", "package/aloe", "aloe"])
            .assert()
            .success()
            .stdout(predicate::str::contains("/project/config.chariot"))
            .stdout(predicate::str::contains(format!(
                "{}=/chariot/sources/aloe:ro",
                cwd.display()
            )))
            .stdout(predicate::str::contains(format!(
                "--path-mappings {}=$SOURCES_DIR/aloe",
                cwd.display()
            )));
    }

    fn initrd_config(temp: &Path, make_body: &str) -> PathBuf {
        let make = script(temp, "fake-make", make_body);
        write_config(
            temp,
            &format!("[initrd]\nmake_program = \"{}\"\n", make.display()),
        )
    }

    #[test]
    #[serial]
    fn initrd_packages_init_program() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("aloe");
        fs::create_dir_all(root.join("init")).unwrap();
        let config = initrd_config(temp.path(), "printf 'ELF' > init.elf");

        tool("aloe-initrd", &config)
            .arg("--root")
            .arg(&root)
            .assert()
            .success()
            .stdout(predicate::str::contains("Archiving init.elf"))
            .stdout(predicate::str::contains("Done"));

        assert!(!root.join("build/initrd").exists());

        let file = fs::File::open(root.join("build/aloe.initrd")).unwrap();
        let mut archive = tar::Archive::new(file);
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .map(|e| {
                let e = e.unwrap();
                assert!(e.header().as_ustar().is_some());
                e.path().unwrap().to_string_lossy().to_string()
            })
            .collect();
        assert_eq!(names, vec!["init.elf"]);
    }

    #[test]
    #[serial]
    fn initrd_build_failure_leaves_no_archive() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("aloe");
        fs::create_dir_all(root.join("init")).unwrap();
        let config = initrd_config(temp.path(), "exit 2");

        tool("aloe-initrd", &config)
            .arg("--root")
            .arg(&root)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Command failed"));

        assert!(root.join("build/initrd").is_dir());
        assert!(!root.join("build/aloe.initrd").exists());
    }

    #[test]
    #[serial]
    fn initrd_refuses_existing_staging() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("aloe");
        fs::create_dir_all(root.join("build/initrd")).unwrap();
        let config = initrd_config(temp.path(), "printf 'ELF' > init.elf");

        tool("aloe-initrd", &config)
            .arg("--root")
            .arg(&root)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("already exists"))
            .stderr(predicate::str::contains("--force"));
    }

    fn qemu_config(temp: &Path, qemu_body: &str) -> (PathBuf, PathBuf) {
        let chariot = fake_chariot(temp);
        let qemu = script(temp, "qemu", qemu_body);
        let font_log = temp.join("font.log");
        let terminal = script(
            temp,
            "terminal",
            &format!("echo \"$3\" >> {}", font_log.display()),
        );
        let config = write_config(
            temp,
            &format!(
                "[chariot]\nprogram = \"{}\"\n\n[qemu]\nprogram = \"{}\"\nfirmware_path = \"/fw/OVMF.fd\"\n\n[terminal]\nprogram = \"{}\"\n",
                chariot.display(),
                qemu.display(),
                terminal.display()
            ),
        );
        (config, font_log)
    }

    #[test]
    #[serial]
    fn qemu_dry_run_prints_command() {
        let temp = TempDir::new().unwrap();
        let (config, font_log) = qemu_config(temp.path(), "exit 0");

        tool("aloe-qemu", &config)
            .arg("--dry-run")
            .assert()
            .success()
            .stdout(predicate::str::contains(format!(
                "-drive format=raw,file={}/out/aloe.img",
                temp.path().display()
            )))
            .stdout(predicate::str::contains(
                "if=pflash,unit=0,format=raw,file=/fw/OVMF.fd,readonly=on",
            ))
            .stdout(predicate::str::contains(" -S -s -no-reboot -no-shutdown "));

        assert!(!font_log.exists());
    }

    #[test]
    #[serial]
    fn qemu_interrupt_exits_zero_and_restores_font() {
        let temp = TempDir::new().unwrap();
        let (config, font_log) = qemu_config(temp.path(), "kill -INT $$");

        tool("aloe-qemu", &config).assert().success();

        let log = fs::read_to_string(font_log).unwrap();
        assert_eq!(log, "font.size=10\nfont.size=13\n");
    }

    #[test]
    #[serial]
    fn qemu_failure_still_restores_font() {
        let temp = TempDir::new().unwrap();
        let (config, font_log) = qemu_config(temp.path(), "exit 1");

        tool("aloe-qemu", &config)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Command failed"));

        let log = fs::read_to_string(font_log).unwrap();
        assert_eq!(log, "font.size=10\nfont.size=13\n");
    }

    #[test]
    #[serial]
    fn help_displays() {
        cargo_bin_cmd!("aloe-qemu")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("QEMU"));
    }
}
