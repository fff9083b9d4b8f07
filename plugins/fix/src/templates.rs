//! Embedded file templates and `{{var}}` substitution.

use chrono::Local;
use std::collections::BTreeMap;
use structlint_project::ProjectInfo;

pub type TemplateVars = BTreeMap<String, String>;

/// Replace every `{{key}}` with its value in a single pass. Values are copied
/// verbatim and unknown placeholders are left as is.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match vars.get(key) {
                    Some(value) => output.push_str(value),
                    None => {
                        output.push_str("{{");
                        output.push_str(key);
                        output.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}

/// Project metadata plus `year`, `date` and `project_type`.
pub fn template_vars(info: &ProjectInfo, project_type: &str) -> TemplateVars {
    let now = Local::now();
    let mut vars = info.template_vars();
    vars.insert("year".to_string(), now.format("%Y").to_string());
    vars.insert("date".to_string(), now.format("%Y-%m-%d").to_string());
    vars.insert("project_type".to_string(), project_type.to_string());
    vars
}

pub const README: &str = r#"# {{name}}

{{description}}

## Getting Started

Describe how to install and run {{name}} here.

## Usage

Add usage examples here.

## Contributing

Contributions are welcome. See [CONTRIBUTING.md](CONTRIBUTING.md) for details.

## License

This project is licensed under the {{license}} license. See [LICENSE](LICENSE).
"#;

pub const LICENSE_MIT: &str = r#"MIT License

Copyright (c) {{year}} {{author}}

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
"#;

pub const LICENSE_APACHE: &str = r#"Copyright {{year}} {{author}}

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
"#;

pub const LICENSE_BSD3: &str = r#"BSD 3-Clause License

Copyright (c) {{year}}, {{author}}

Redistribution and use in source and binary forms, with or without
modification, are permitted provided that the following conditions are met:

1. Redistributions of source code must retain the above copyright notice, this
   list of conditions and the following disclaimer.

2. Redistributions in binary form must reproduce the above copyright notice,
   this list of conditions and the following disclaimer in the documentation
   and/or other materials provided with the distribution.

3. Neither the name of the copyright holder nor the names of its
   contributors may be used to endorse or promote products derived from
   this software without specific prior written permission.

THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
"#;

pub const LICENSE_ISC: &str = r#"ISC License

Copyright (c) {{year}} {{author}}

Permission to use, copy, modify, and/or distribute this software for any
purpose with or without fee is hereby granted, provided that the above
copyright notice and this permission notice appear in all copies.

THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHOR DISCLAIMS ALL WARRANTIES
WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHOR BE LIABLE FOR
ANY SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN
ACTION OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF
OR IN CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.
"#;

pub const LICENSE_GPL3: &str = r#"{{name}}
Copyright (C) {{year}} {{author}}

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.
"#;

/// License text for an SPDX-like identifier; anything unknown gets MIT.
pub fn license_text(license: &str) -> &'static str {
    match license.trim().to_ascii_uppercase().as_str() {
        "APACHE-2.0" | "APACHE 2.0" | "APACHE" => LICENSE_APACHE,
        "BSD-3-CLAUSE" | "BSD-3" | "BSD" => LICENSE_BSD3,
        "ISC" => LICENSE_ISC,
        "GPL-3.0" | "GPL-3.0-ONLY" | "GPL-3.0-OR-LATER" | "GPLV3" | "GPL" => LICENSE_GPL3,
        _ => LICENSE_MIT,
    }
}

const GITIGNORE_COMMON: &str = r#"# Editors
.idea/
.vscode/
*.swp
.DS_Store

# Environment
.env
.env.local
"#;

pub fn gitignore(project_type: &str) -> String {
    let specific = match project_type {
        "go" => "# Go\n/bin/\n*.exe\n*.test\n*.out\ncoverage.txt\n",
        "rust" => "# Rust\n/target/\n**/*.rs.bk\n",
        "nodejs" => "# Node\nnode_modules/\ndist/\ncoverage/\nnpm-debug.log*\n",
        "python" => {
            "# Python\n__pycache__/\n*.py[cod]\n.venv/\nvenv/\n*.egg-info/\n.pytest_cache/\ndist/\nbuild/\n"
        }
        "java" => "# Java\ntarget/\nbuild/\n*.class\n*.jar\n.gradle/\n",
        _ => "# Build output\nbuild/\ndist/\n*.log\n",
    };
    format!("{}\n{}", specific, GITIGNORE_COMMON)
}

pub const CHANGELOG: &str = r#"# Changelog

All notable changes to {{name}} will be documented in this file.

The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.1.0/),
and this project adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).

## [Unreleased]

### Added

- Initial project structure ({{date}})
"#;

pub const CONTRIBUTING: &str = r#"# Contributing to {{name}}

Thanks for taking the time to contribute!

## Reporting issues

Search the existing issues before opening a new one: {{issues_url}}

## Pull requests

1. Fork the repository and create a branch from `main`.
2. Add tests for any behaviour you change.
3. Make sure the test suite and linters pass.
4. Open a pull request describing the change.

## Questions

Reach the maintainers at {{email}}.
"#;

pub const SECURITY: &str = r#"# Security Policy

## Supported Versions

Only the latest release of {{name}} receives security updates.

## Reporting a Vulnerability

Please do not report security vulnerabilities through public issues.
Email {{email}} with a description of the issue and steps to reproduce.
You should receive a response within 72 hours.
"#;

pub const CODE_OF_CONDUCT: &str = r#"# Code of Conduct

## Our Pledge

We as members, contributors, and leaders pledge to make participation in the
{{name}} community a harassment-free experience for everyone.

## Our Standards

Examples of behavior that contributes to a positive environment:

- Demonstrating empathy and kindness toward other people
- Being respectful of differing opinions, viewpoints, and experiences
- Giving and gracefully accepting constructive feedback

## Enforcement

Instances of abusive, harassing, or otherwise unacceptable behavior may be
reported to the maintainers at {{email}}.

## Attribution

This Code of Conduct is adapted from the Contributor Covenant, version 2.1,
available at https://www.contributor-covenant.org/version/2/1/code_of_conduct.html
"#;

pub const PR_TEMPLATE: &str = r#"## Summary

<!-- What does this change do and why? -->

## Changes

-

## Testing

<!-- How was this verified? -->

## Checklist

- [ ] Tests added or updated
- [ ] Documentation updated
"#;

pub const CODEOWNERS: &str = r#"# Default owners for everything in the repository.
* @{{owner}}
"#;

pub const EDITORCONFIG: &str = r#"root = true

[*]
charset = utf-8
end_of_line = lf
insert_final_newline = true
trim_trailing_whitespace = true
indent_style = space
indent_size = 4

[*.{yml,yaml,json}]
indent_size = 2

[Makefile]
indent_style = tab

[*.go]
indent_style = tab
"#;

pub fn pre_commit(project_type: &str) -> String {
    let hooks = match project_type {
        "go" => {
            r#"  - repo: https://github.com/dnephin/pre-commit-golang
    rev: v0.5.1
    hooks:
      - id: go-fmt
      - id: go-vet
"#
        }
        "rust" => {
            r#"  - repo: https://github.com/doublify/pre-commit-rust
    rev: v1.0
    hooks:
      - id: fmt
      - id: clippy
"#
        }
        "python" => {
            r#"  - repo: https://github.com/astral-sh/ruff-pre-commit
    rev: v0.6.9
    hooks:
      - id: ruff
      - id: ruff-format
"#
        }
        "nodejs" => {
            r#"  - repo: https://github.com/pre-commit/mirrors-prettier
    rev: v3.1.0
    hooks:
      - id: prettier
"#
        }
        _ => "",
    };
    format!(
        r#"repos:
  - repo: https://github.com/pre-commit/pre-commit-hooks
    rev: v4.6.0
    hooks:
      - id: trailing-whitespace
      - id: end-of-file-fixer
      - id: check-yaml
      - id: check-added-large-files
{}"#,
        hooks
    )
}

pub fn dockerfile(project_type: &str) -> &'static str {
    match project_type {
        "go" => {
            r#"FROM golang:1.22 AS build
WORKDIR /src
COPY go.mod go.sum* ./
RUN go mod download
COPY . .
RUN CGO_ENABLED=0 go build -o /out/{{name}} ./...

FROM gcr.io/distroless/static-debian12
COPY --from=build /out/{{name}} /{{name}}
ENTRYPOINT ["/{{name}}"]
"#
        }
        "rust" => {
            r#"FROM rust:1.80 AS build
WORKDIR /src
COPY . .
RUN cargo build --release

FROM debian:bookworm-slim
COPY --from=build /src/target/release/{{name}} /usr/local/bin/{{name}}
ENTRYPOINT ["{{name}}"]
"#
        }
        "nodejs" => {
            r#"FROM node:20-alpine
WORKDIR /app
COPY package*.json ./
RUN npm ci --omit=dev
COPY . .
EXPOSE 3000
CMD ["npm", "start"]
"#
        }
        "python" => {
            r#"FROM python:3.12-slim
WORKDIR /app
COPY requirements*.txt ./
RUN pip install --no-cache-dir -r requirements.txt
COPY . .
CMD ["python", "-m", "{{name}}"]
"#
        }
        "java" => {
            r#"FROM eclipse-temurin:21-jdk AS build
WORKDIR /src
COPY . .
RUN ./mvnw -q package -DskipTests

FROM eclipse-temurin:21-jre
COPY --from=build /src/target/*.jar /app/app.jar
ENTRYPOINT ["java", "-jar", "/app/app.jar"]
"#
        }
        _ => {
            r#"FROM debian:bookworm-slim
WORKDIR /app
COPY . .
CMD ["./run.sh"]
"#
        }
    }
}

pub const DOCKERIGNORE: &str = r#".git
.github
.env
*.log
node_modules
target
dist
build
"#;

pub const DOCKER_COMPOSE: &str = r#"services:
  {{name}}:
    build: .
    ports:
      - "8080:8080"
    env_file:
      - .env
    restart: unless-stopped
"#;

pub fn makefile(project_type: &str) -> &'static str {
    match project_type {
        "go" => {
            ".PHONY: build test lint\n\nbuild:\n\tgo build ./...\n\ntest:\n\tgo test ./...\n\nlint:\n\tgolangci-lint run\n"
        }
        "rust" => {
            ".PHONY: build test lint\n\nbuild:\n\tcargo build\n\ntest:\n\tcargo test\n\nlint:\n\tcargo clippy -- -D warnings\n"
        }
        "nodejs" => {
            ".PHONY: install test lint\n\ninstall:\n\tnpm install\n\ntest:\n\tnpm test\n\nlint:\n\tnpm run lint\n"
        }
        "python" => {
            ".PHONY: install test lint\n\ninstall:\n\tpip install -r requirements.txt\n\ntest:\n\tpytest\n\nlint:\n\truff check .\n"
        }
        "java" => ".PHONY: build test\n\nbuild:\n\t./mvnw package\n\ntest:\n\t./mvnw test\n",
        _ => ".PHONY: build test\n\nbuild:\n\t@echo \"build {{name}}\"\n\ntest:\n\t@echo \"test {{name}}\"\n",
    }
}

/// Linter configuration; `None` when the project type has no convention.
pub fn linter(project_type: &str) -> Option<&'static str> {
    match project_type {
        "go" => Some(
            "linters:\n  enable:\n    - errcheck\n    - govet\n    - staticcheck\n    - unused\n",
        ),
        "rust" => Some("edition = \"2021\"\nmax_width = 100\n"),
        "nodejs" => Some(
            r#"import js from "@eslint/js";

export default [
  js.configs.recommended,
  {
    rules: {
      "no-unused-vars": "warn",
    },
  },
];
"#,
        ),
        "python" => Some("line-length = 100\n\n[lint]\nselect = [\"E\", \"F\", \"I\"]\n"),
        "java" => Some(
            r#"<?xml version="1.0"?>
<!DOCTYPE module PUBLIC "-//Checkstyle//DTD Checkstyle Configuration 1.3//EN"
  "https://checkstyle.org/dtds/configuration_1_3.dtd">
<module name="Checker">
  <module name="TreeWalker">
    <module name="UnusedImports"/>
  </module>
</module>
"#,
        ),
        _ => None,
    }
}

pub fn ci_workflow(project_type: &str) -> &'static str {
    match project_type {
        "go" => {
            r#"name: CI

on:
  push:
    branches: [main]
  pull_request:

jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-go@v5
        with:
          go-version: stable
      - run: go vet ./...
      - run: go test ./...
"#
        }
        "rust" => {
            r#"name: CI

on:
  push:
    branches: [main]
  pull_request:

jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: dtolnay/rust-toolchain@stable
        with:
          components: clippy, rustfmt
      - run: cargo fmt --check
      - run: cargo clippy -- -D warnings
      - run: cargo test
"#
        }
        "nodejs" => {
            r#"name: CI

on:
  push:
    branches: [main]
  pull_request:

jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-node@v4
        with:
          node-version: 20
      - run: npm ci
      - run: npm test
"#
        }
        "python" => {
            r#"name: CI

on:
  push:
    branches: [main]
  pull_request:

jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-python@v5
        with:
          python-version: "3.12"
      - run: pip install -r requirements.txt pytest
      - run: pytest
"#
        }
        "java" => {
            r#"name: CI

on:
  push:
    branches: [main]
  pull_request:

jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-java@v4
        with:
          distribution: temurin
          java-version: 21
      - run: ./mvnw -B verify
"#
        }
        _ => {
            r#"name: CI

on:
  push:
    branches: [main]
  pull_request:

jobs:
  build:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - run: make test
"#
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_occurrence() {
        let mut vars = TemplateVars::new();
        vars.insert("name".to_string(), "widget".to_string());
        assert_eq!(render("{{name}} and {{name}}", &vars), "widget and widget");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        let vars = TemplateVars::new();
        assert_eq!(render("hello {{who}}", &vars), "hello {{who}}");
    }

    #[test]
    fn test_render_copies_values_verbatim() {
        let mut vars = TemplateVars::new();
        vars.insert("description".to_string(), "Renders {{name}} placeholders".to_string());
        vars.insert("name".to_string(), "widget".to_string());
        assert_eq!(
            render("{{name}}: {{description}}", &vars),
            "widget: Renders {{name}} placeholders"
        );
    }

    #[test]
    fn test_render_keeps_unterminated_braces() {
        let mut vars = TemplateVars::new();
        vars.insert("name".to_string(), "widget".to_string());
        assert_eq!(render("{{name}} uses {{ braces", &vars), "widget uses {{ braces");
    }

    #[test]
    fn test_template_vars_include_dates() {
        let vars = template_vars(&ProjectInfo::with_name("widget"), "rust");
        assert_eq!(vars["name"], "widget");
        assert_eq!(vars["project_type"], "rust");
        assert_eq!(vars["year"].len(), 4);
        assert_eq!(vars["date"].len(), 10);
    }

    #[test]
    fn test_license_selection() {
        assert_eq!(license_text("Apache-2.0"), LICENSE_APACHE);
        assert_eq!(license_text("bsd-3-clause"), LICENSE_BSD3);
        assert_eq!(license_text("ISC"), LICENSE_ISC);
        assert_eq!(license_text("GPL-3.0"), LICENSE_GPL3);
        assert_eq!(license_text("WTFPL"), LICENSE_MIT);
    }

    #[test]
    fn test_generated_files_clear_size_thresholds() {
        let vars = template_vars(&ProjectInfo::with_name("x"), "generic");
        assert!(render(README, &vars).len() >= 100);
        for license in [LICENSE_MIT, LICENSE_APACHE, LICENSE_BSD3, LICENSE_ISC, LICENSE_GPL3] {
            assert!(render(license, &vars).len() >= 100);
        }
        for project_type in ["go", "rust", "nodejs", "python", "java", "generic"] {
            assert!(gitignore(project_type).len() >= 10);
        }
    }
}
