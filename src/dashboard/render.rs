use std::fmt::Write;

use super::cache::Snapshot;
use crate::models::{Commit, Deployment, PullRequest, Repository};

pub fn render_dashboard(snapshot: &Snapshot) -> String {
    let body = if !snapshot.is_ready() {
        "<p class=\"notice\">Fetching repositories, refresh in a few seconds.</p>".to_string()
    } else if snapshot.repositories.is_empty() {
        "<p class=\"notice\">No repositories to show.</p>".to_string()
    } else {
        snapshot
            .repositories
            .iter()
            .map(render_repository)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let footer = match snapshot.refreshed_at {
        Some(at) => format!(
            "{} API calls, average response time {:?}, updated {}",
            snapshot.stats.calls,
            snapshot.stats.average_latency,
            at.format("%b %-d %H:%M:%S UTC")
        ),
        None => "Waiting for the first update".to_string(),
    };

    format!(
        "<!doctype html>\n<html lang=\"en\">\n  <head>\n    <meta charset=\"utf-8\">\n    <title>Repository dashboard</title>\n    <link rel=\"stylesheet\" href=\"/static/style.css\">\n  </head>\n  <body>\n    <h1>Repository dashboard</h1>\n    <main>\n{body}\n    </main>\n    <footer class=\"stats\">{}</footer>\n  </body>\n</html>\n",
        html_escape(&footer)
    )
}

fn render_repository(repo: &Repository) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "<section class=\"repository\">");
    let _ = writeln!(
        out,
        "  <h2><a href=\"{}\" title=\"{}\">{}</a></h2>",
        html_escape(&repo.html_url),
        html_escape(&repo.full_name),
        html_escape(&repo.name)
    );
    if !repo.description.is_empty() {
        let _ = writeln!(out, "  <p>{}</p>", html_escape(&repo.description));
    }

    let mut facts = vec![format!("&#9733; {}", repo.stars)];
    if !repo.team.is_empty() {
        facts.push(format!("team {}", html_escape(&repo.team)));
    }
    if !repo.pushed_at.is_empty() {
        facts.push(format!("pushed {}", html_escape(&repo.pushed_at)));
    }
    if !repo.ci_link.is_empty() {
        facts.push(format!("<a href=\"{}\">CI</a>", html_escape(&repo.ci_link)));
    }
    let _ = writeln!(out, "  <p class=\"facts\">{}</p>", facts.join(" &middot; "));
    if !repo.topics.is_empty() {
        let topics: Vec<String> = repo
            .topics
            .iter()
            .map(|topic| format!("<span class=\"topic\">{}</span>", html_escape(topic)))
            .collect();
        let _ = writeln!(out, "  <p class=\"topics\">{}</p>", topics.join(" "));
    }

    out.push_str(&render_pull_requests(&repo.pull_requests));
    out.push_str(&render_commits(&repo.commits));
    out.push_str(&render_deployments(repo.deployments.as_deref()));
    out.push_str("</section>");

    out
}

fn render_pull_requests(pull_requests: &[PullRequest]) -> String {
    let items: Vec<String> = pull_requests
        .iter()
        .map(|pr| {
            format!(
                "<li><a href=\"{}\">{}</a> <span class=\"date\">{}</span></li>",
                html_escape(&pr.link),
                html_escape(&pr.title),
                html_escape(&pr.created_at)
            )
        })
        .collect();
    render_list("Open pull requests", &items, "No open pull requests")
}

fn render_commits(commits: &[Commit]) -> String {
    let items: Vec<String> = commits
        .iter()
        .map(|commit| {
            format!(
                "<li><a href=\"{}\">{}</a> by {} <span class=\"date\">{}</span></li>",
                html_escape(&commit.link),
                html_escape(&commit.message),
                html_escape(&commit.author),
                html_escape(&commit.date)
            )
        })
        .collect();
    render_list("Recent commits", &items, "No recent commits")
}

fn render_deployments(deployments: Option<&[Deployment]>) -> String {
    let Some(deployments) = deployments else {
        return "  <h3>Deployments</h3>\n  <p class=\"error\">Deployments unavailable</p>\n"
            .to_string();
    };

    let items: Vec<String> = deployments
        .iter()
        .map(|deployment| {
            format!(
                "<li>{} <strong>{}</strong> {}</li>",
                html_escape(&deployment.created_at),
                html_escape(&deployment.environment),
                html_escape(&deployment.stack)
            )
        })
        .collect();
    render_list("Deployments", &items, "No deployments")
}

fn render_list(title: &str, items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return format!("  <h3>{title}</h3>\n  <p class=\"empty\">{empty}</p>\n");
    }
    format!(
        "  <h3>{title}</h3>\n  <ul>\n    {}\n  </ul>\n",
        items.join("\n    ")
    )
}

fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsSnapshot;
    use std::time::Duration;

    fn sample_repository() -> Repository {
        Repository {
            name: "test-repo".to_string(),
            full_name: "acme/test-repo".to_string(),
            description: "Orders <service>".to_string(),
            topics: vec!["t-backend".to_string()],
            stars: 12,
            team: "backend".to_string(),
            pushed_at: "Jun 15".to_string(),
            html_url: "https://github.com/acme/test-repo".to_string(),
            ci_link: "https://ci.example.com/job/test-repo".to_string(),
            pull_requests: vec![PullRequest {
                title: "Add \"quotes\" & more".to_string(),
                link: "https://github.com/acme/test-repo/pull/1".to_string(),
                created_at: "Jun 14".to_string(),
            }],
            commits: vec![Commit {
                message: "Fix login (#42)".to_string(),
                author: "Jane Doe".to_string(),
                date: "Jun 13".to_string(),
                link: "https://github.com/acme/test-repo/commit/abc".to_string(),
            }],
            deployments: Some(vec![Deployment {
                created_at: "Jun 12 10:30:00".to_string(),
                environment: "stage".to_string(),
                stack: "customer-profile-events".to_string(),
            }]),
        }
    }

    fn ready_snapshot(repositories: Vec<Repository>) -> Snapshot {
        Snapshot::new(
            repositories,
            StatsSnapshot {
                calls: 4,
                average_latency: Duration::from_millis(150),
            },
        )
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_before_first_refresh() {
        let html = render_dashboard(&Snapshot::default());

        assert!(html.contains("Fetching repositories"));
        assert!(html.contains("Waiting for the first update"));
    }

    #[test]
    fn test_render_without_repositories() {
        let html = render_dashboard(&ready_snapshot(vec![]));

        assert!(html.contains("No repositories to show."));
        assert!(html.contains("4 API calls, average response time 150ms"));
    }

    #[test]
    fn test_render_repository_details() {
        let html = render_dashboard(&ready_snapshot(vec![sample_repository()]));

        assert!(html.contains(
            "<a href=\"https://github.com/acme/test-repo\" title=\"acme/test-repo\">test-repo</a>"
        ));
        assert!(html.contains("<span class=\"topic\">t-backend</span>"));
        assert!(html.contains("Orders &lt;service&gt;"));
        assert!(html.contains("team backend"));
        assert!(html.contains("<a href=\"https://ci.example.com/job/test-repo\">CI</a>"));
        assert!(html.contains("Add &quot;quotes&quot; &amp; more"));
        assert!(html.contains("Fix login (#42)</a> by Jane Doe"));
        assert!(html.contains("<strong>stage</strong> customer-profile-events"));
        assert!(!html.contains("<service>"));
    }

    #[test]
    fn test_render_distinguishes_missing_from_empty_deployments() {
        let unavailable = Repository {
            deployments: None,
            ..sample_repository()
        };
        let quiet = Repository {
            deployments: Some(vec![]),
            ..sample_repository()
        };

        assert!(render_repository(&unavailable).contains("Deployments unavailable"));
        assert!(render_repository(&quiet).contains("No deployments"));
    }

    #[test]
    fn test_render_keeps_repository_order() {
        let first = Repository {
            name: "zeta".to_string(),
            ..Repository::default()
        };
        let second = Repository {
            name: "alpha".to_string(),
            ..Repository::default()
        };

        let html = render_dashboard(&ready_snapshot(vec![first, second]));

        let zeta = html.find("zeta").unwrap();
        let alpha = html.find("alpha").unwrap();
        assert!(zeta < alpha);
    }
}
