//! Generators that create a set of related files in one go.

use crate::templates::{ci_workflow, render, TemplateVars};
use structlint_rules::MultiFileKind;

/// A file to create, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(root: &str, name: &str, content: impl Into<String>) -> Self {
        let root = root.trim_end_matches('/');
        let path = if root.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", root, name)
        };
        Self {
            path,
            content: content.into(),
        }
    }
}

/// Short description used in prompts and change records.
pub fn describe(kind: MultiFileKind) -> &'static str {
    match kind {
        MultiFileKind::IssueTemplates => "issue templates",
        MultiFileKind::Adr => "architecture decision records",
        MultiFileKind::Scripts => "developer scripts",
        MultiFileKind::CiWorkflow => "CI workflow",
        MultiFileKind::Kubernetes => "Kubernetes manifests",
        MultiFileKind::Nginx => "nginx configuration",
    }
}

/// All files of `kind` under `root`, in creation order.
fn issue_config(vars: &TemplateVars) -> &'static str {
    match vars.get("repository_url") {
        Some(url) if !url.trim().is_empty() => ISSUE_CONFIG,
        _ => ISSUE_CONFIG_MINIMAL,
    }
}

pub fn generate(
    kind: MultiFileKind,
    root: &str,
    vars: &TemplateVars,
    project_type: &str,
) -> Vec<GeneratedFile> {
    let files: Vec<(&str, String)> = match kind {
        MultiFileKind::IssueTemplates => vec![
            ("bug_report.md", BUG_REPORT.to_string()),
            ("feature_request.md", FEATURE_REQUEST.to_string()),
            ("config.yml", issue_config(vars).to_string()),
        ],
        MultiFileKind::Adr => vec![
            ("README.md", ADR_INDEX.to_string()),
            ("template.md", ADR_TEMPLATE.to_string()),
            ("0001-record-architecture-decisions.md", ADR_FIRST.to_string()),
        ],
        MultiFileKind::Scripts => scripts(project_type),
        MultiFileKind::CiWorkflow => vec![("ci.yml", ci_workflow(project_type).to_string())],
        MultiFileKind::Kubernetes => vec![
            ("deployment.yaml", K8S_DEPLOYMENT.to_string()),
            ("service.yaml", K8S_SERVICE.to_string()),
        ],
        MultiFileKind::Nginx => vec![("nginx.conf", NGINX_CONF.to_string())],
    };

    files
        .into_iter()
        .map(|(name, template)| GeneratedFile::new(root, name, render(&template, vars)))
        .collect()
}

fn scripts(project_type: &str) -> Vec<(&'static str, String)> {
    let (setup, test, lint) = match project_type {
        "go" => ("go mod download", "go test ./...", "go vet ./..."),
        "rust" => ("cargo fetch", "cargo test", "cargo clippy -- -D warnings"),
        "nodejs" => ("npm install", "npm test", "npm run lint"),
        "python" => (
            "pip install -r requirements.txt",
            "pytest",
            "ruff check .",
        ),
        "java" => ("./mvnw -q dependency:resolve", "./mvnw test", "./mvnw -q checkstyle:check"),
        _ => (
            "echo \"nothing to set up\"",
            "echo \"no tests configured\"",
            "echo \"no linter configured\"",
        ),
    };
    vec![
        ("setup.sh", script("Install dependencies for {{name}}", setup)),
        ("test.sh", script("Run the {{name}} test suite", test)),
        ("lint.sh", script("Lint {{name}}", lint)),
    ]
}

fn script(summary: &str, command: &str) -> String {
    format!(
        "#!/usr/bin/env bash\n# {}\nset -euo pipefail\n\ncd \"$(dirname \"$0\")/..\"\n{}\n",
        summary, command
    )
}

const BUG_REPORT: &str = r#"---
name: Bug report
about: Report something that is not working in {{name}}
labels: bug
---

## Describe the bug

## Steps to reproduce

1.
2.

## Expected behavior

## Environment

- Version:
- OS:
"#;

const FEATURE_REQUEST: &str = r#"---
name: Feature request
about: Suggest an idea for {{name}}
labels: enhancement
---

## Problem

## Proposed solution

## Alternatives considered
"#;

/// Used when no repository URL is known; `contact_links` must be absolute.
const ISSUE_CONFIG_MINIMAL: &str = "blank_issues_enabled: false\n";

const ISSUE_CONFIG: &str = r#"blank_issues_enabled: false
contact_links:
  - name: Security issue
    url: {{repository_url}}/security/policy
    about: Please report security vulnerabilities privately.
"#;

const ADR_INDEX: &str = r#"# Architecture Decision Records

Significant decisions for {{name}} are recorded here, one numbered file per
decision. Copy `template.md` to start a new record.

- [0001 Record architecture decisions](0001-record-architecture-decisions.md)
"#;

const ADR_TEMPLATE: &str = r#"# NNNN. Title

Date: YYYY-MM-DD

## Status

Proposed

## Context

## Decision

## Consequences
"#;

const ADR_FIRST: &str = r#"# 0001. Record architecture decisions

Date: {{date}}

## Status

Accepted

## Context

We need to record the architectural decisions made on {{name}}.

## Decision

We will use Architecture Decision Records, as described by Michael Nygard in
"Documenting Architecture Decisions".

## Consequences

Each significant decision gets a numbered record in this folder.
"#;

const K8S_DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{name}}
  labels:
    app: {{name}}
spec:
  replicas: 2
  selector:
    matchLabels:
      app: {{name}}
  template:
    metadata:
      labels:
        app: {{name}}
    spec:
      containers:
        - name: {{name}}
          image: {{name}}:latest
          ports:
            - containerPort: 8080
"#;

const K8S_SERVICE: &str = r#"apiVersion: v1
kind: Service
metadata:
  name: {{name}}
spec:
  selector:
    app: {{name}}
  ports:
    - port: 80
      targetPort: 8080
"#;

const NGINX_CONF: &str = r#"events {}

http {
  upstream {{name}} {
    server 127.0.0.1:8080;
  }

  server {
    listen 80;

    location / {
      proxy_pass http://{{name}};
      proxy_set_header Host $host;
      proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
    }
  }
}
"#;
