//! Command-line interface.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use mclip_firestore::{FirestoreClient, ProjectRepository};
use mclip_models::{
    CameraConfig, CameraMovement, CameraPreset, ClipDuration, MovementSpeed, Project, ProjectId,
    VideoResolution, CAMERA_PRESETS, MUSIC_TRACKS,
};
use mclip_storage::BlobClient;
use mclip_studio::{
    AssetStore, ProjectScope, ProjectStore, StudioConfig, StudioError, StudioSession,
    VideoGenerator,
};
use mclip_veo::VeoClient;
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "mclip", version, about = "Animate still images into short video clips")]
pub struct Cli {
    /// Log level for mclip crates (RUST_LOG overrides)
    #[arg(long, global = true, env = "MCLIP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    #[arg(
        long,
        global = true,
        env = "LOG_FORMAT",
        value_enum,
        ignore_case = true,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Animate an image into a clip
    Generate(GenerateArgs),
    /// Browse and edit saved projects
    #[command(subcommand)]
    Projects(ProjectsCommand),
    /// Download a saved project's video
    Download(DownloadArgs),
    /// List camera presets
    Presets,
    /// List background music tracks
    Tracks,
}

#[derive(Debug, clap::Args)]
pub struct GenerateArgs {
    /// Source image (png, jpg, webp or gif)
    #[arg(long, short)]
    pub image: PathBuf,

    /// What should happen in the clip
    #[arg(long, short)]
    pub prompt: String,

    #[arg(long, default_value = "720p")]
    pub resolution: VideoResolution,

    /// Camera preset name or slug, e.g. cinematic-zoom
    #[arg(long)]
    pub preset: Option<String>,

    #[arg(long)]
    pub movement: Option<CameraMovement>,

    #[arg(long)]
    pub speed: Option<MovementSpeed>,

    #[arg(long)]
    pub duration: Option<ClipDuration>,

    /// Camera intensity, 1 to 10
    #[arg(long)]
    pub intensity: Option<u8>,

    /// Background music track name
    #[arg(long)]
    pub music: Option<String>,

    /// Also write the clip (with music) to this directory
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Save the result as a project
    #[arg(long)]
    pub save: bool,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

impl GenerateArgs {
    /// Preset first, then individual overrides. `None` when no camera option was given.
    fn camera(&self) -> Result<Option<CameraConfig>> {
        let mut camera = match &self.preset {
            Some(name) => Some(CameraPreset::find(name)?.config()),
            None => None,
        };

        if self.movement.is_some()
            || self.speed.is_some()
            || self.duration.is_some()
            || self.intensity.is_some()
        {
            let config = camera.get_or_insert_with(CameraConfig::default);
            if let Some(movement) = self.movement {
                config.movement = movement;
            }
            if let Some(speed) = self.speed {
                config.speed = speed;
            }
            if let Some(duration) = self.duration {
                config.duration = duration;
            }
            if let Some(intensity) = self.intensity {
                config.intensity = intensity;
            }
        }

        Ok(camera)
    }
}

#[derive(Debug, Subcommand)]
pub enum ProjectsCommand {
    /// List projects, newest first
    List {
        /// Only the signed-in user's projects
        #[arg(long)]
        mine: bool,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show one project
    Show { id: String },
    /// Edit description and tags
    Update {
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "tag")]
        add_tags: Vec<String>,
        #[arg(long = "remove-tag")]
        remove_tags: Vec<String>,
    },
    /// Delete a project record
    Delete { id: String },
}

#[derive(Debug, clap::Args)]
pub struct DownloadArgs {
    pub id: String,

    #[arg(long, short, default_value = ".")]
    pub out: PathBuf,

    /// Override the project's music track
    #[arg(long)]
    pub music: Option<String>,
}

// =============================================================================
// Wiring
// =============================================================================

/// Build a session from the environment. Services that are not configured
/// are left out; commands that need them fail with a configuration error.
async fn build_session() -> StudioSession {
    let config = StudioConfig::from_env();

    let generator: Option<Arc<dyn VideoGenerator>> = match VeoClient::from_env() {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "Video generation unavailable");
            None
        }
    };

    let mut session = StudioSession::new(config, generator);

    match FirestoreClient::from_env().await {
        Ok(client) => {
            let store: Arc<dyn ProjectStore> = Arc::new(ProjectRepository::new(client));
            session = session.with_project_store(store);
        }
        Err(e) => warn!(error = %e, "Project store unavailable"),
    }

    match BlobClient::from_env().await {
        Ok(client) => {
            let assets: Arc<dyn AssetStore> = Arc::new(client);
            session = session.with_asset_store(assets);
        }
        Err(e) => warn!(error = %e, "Asset storage unavailable"),
    }

    session
}

pub async fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Command::Presets => {
            print_presets(json)?;
            Ok(())
        }
        Command::Tracks => {
            print_tracks(json)?;
            Ok(())
        }
        Command::Generate(args) => generate(build_session().await, args, json).await,
        Command::Projects(cmd) => projects(build_session().await, cmd, json).await,
        Command::Download(args) => download(build_session().await, args, json).await,
    }
}

// =============================================================================
// Commands
// =============================================================================

async fn generate(mut session: StudioSession, args: GenerateArgs, json: bool) -> Result<()> {
    session.set_image(&args.image);
    session.set_prompt(&args.prompt);
    session.set_resolution(args.resolution);
    if let Some(camera) = args.camera()? {
        session.set_camera(camera)?;
    }
    if let Some(name) = &args.music {
        let track = session.set_music(name);
        if track.is_none() && !name.eq_ignore_ascii_case("none") {
            warn!(music = %name, "Unknown music track, using none");
        }
    }

    let handle = session.generate().await?;
    info!(path = %handle.path.display(), "Clip ready");

    let project_id = if args.save {
        if let Some(description) = &args.description {
            session.set_description(description);
        }
        for tag in &args.tags {
            session.add_tag(tag);
        }
        Some(session.save().await.context("Failed to save the project")?)
    } else {
        None
    };

    let download = match &args.out {
        Some(dir) => Some(session.download(dir).await?),
        None => None,
    };

    if json {
        print_json(&json!({
            "video": handle,
            "projectId": project_id,
            "download": download,
        }))?;
    } else {
        println!("Video: {}", handle.path.display());
        if let Some(id) = project_id {
            println!("Project: {}", id);
        }
        if let Some(path) = download {
            println!("Downloaded: {}", path.display());
        }
    }
    Ok(())
}

async fn projects(mut session: StudioSession, cmd: ProjectsCommand, json: bool) -> Result<()> {
    match cmd {
        ProjectsCommand::List { mine, tag } => {
            let scope = if mine { ProjectScope::Mine } else { ProjectScope::All };
            session.load_projects(scope).await?;
            let projects: Vec<&Project> = match &tag {
                Some(tag) => session.filter_by_tag(tag),
                None => session.projects().iter().collect(),
            };
            print_projects(&projects, json)
        }
        ProjectsCommand::Show { id } => {
            let project = session.find_project(&ProjectId::from(id)).await?;
            print_project(&project, json)
        }
        ProjectsCommand::Update {
            id,
            description,
            add_tags,
            remove_tags,
        } => {
            let project_id = ProjectId::from(id);
            let project = session.find_project(&project_id).await?;
            let user = session.user().ok_or(StudioError::NotSignedIn)?;
            if user.uid != project.user_id {
                bail!("Only the owner can edit project {}", project_id);
            }
            session.select_project(&project);
            if let Some(description) = description {
                session.set_description(description);
            }
            for tag in &add_tags {
                session.add_tag(tag);
            }
            for tag in &remove_tags {
                session.remove_tag(tag);
            }
            let id = session.save().await.context("Failed to save the project")?;

            let mut updated = project;
            updated.description = Some(session.description().to_string());
            updated.tags = session.tags().to_vec();
            if !json {
                println!("Updated {}", id);
            }
            print_project(&updated, json)
        }
        ProjectsCommand::Delete { id } => {
            let id = ProjectId::from(id);
            session.delete_project(&id).await?;
            if json {
                print_json(&json!({ "deleted": id }))
            } else {
                println!("Deleted {}", id);
                Ok(())
            }
        }
    }
}

async fn download(mut session: StudioSession, args: DownloadArgs, json: bool) -> Result<()> {
    let project = session.find_project(&ProjectId::from(args.id)).await?;
    session.select_project(&project);
    if let Some(name) = &args.music {
        session.set_music(name);
    }

    let path = session.download(&args.out).await?;
    if json {
        print_json(&json!({ "path": path, "music": session.music().name }))
    } else {
        println!("{}", path.display());
        Ok(())
    }
}

// =============================================================================
// Output
// =============================================================================

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_presets(json: bool) -> Result<()> {
    if json {
        return print_json(&CAMERA_PRESETS);
    }
    for preset in CAMERA_PRESETS {
        println!(
            "{:<16} {:<16} {} {} {} intensity {:>2}  {}",
            preset.name,
            preset.slug(),
            preset.movement,
            preset.speed,
            preset.duration,
            preset.intensity,
            preset.description
        );
    }
    Ok(())
}

fn print_tracks(json: bool) -> Result<()> {
    if json {
        return print_json(&MUSIC_TRACKS);
    }
    for track in MUSIC_TRACKS {
        let url = if track.is_none() { "(no music)" } else { track.url };
        println!("{:<20} {}", track.name, url);
    }
    Ok(())
}

fn print_projects(projects: &[&Project], json: bool) -> Result<()> {
    if json {
        return print_json(&projects);
    }
    if projects.is_empty() {
        println!("No projects");
    }
    for project in projects {
        println!(
            "{:<20}  {}  {:<5}  {}{}",
            project.id.as_ref().map(|id| id.as_str()).unwrap_or("-"),
            project.created_at.format("%Y-%m-%d %H:%M"),
            project.resolution,
            truncate(&project.prompt, 48),
            format_tags(&project.tags)
        );
    }
    Ok(())
}

fn print_project(project: &Project, json: bool) -> Result<()> {
    if json {
        return print_json(project);
    }
    let id = project.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
    println!("Id:          {}", id);
    println!("Owner:       {}", project.user_name.as_deref().unwrap_or(&project.user_email));
    println!("Created:     {}", project.created_at.to_rfc3339());
    println!("Prompt:      {}", project.prompt);
    println!("Resolution:  {}", project.resolution);
    println!("Music:       {}", project.music_track);
    if let Some(camera) = project.camera_config() {
        println!("Camera:      {}", camera.directive());
    }
    if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
        println!("Description: {}", description);
    }
    if !project.tags.is_empty() {
        println!("Tags:        {}", project.tags.join(", "));
    }
    println!("Video:       {}", project.video_url);
    if !project.image_url.is_empty() {
        println!("Image:       {}", project.image_url);
    }
    if let Some(thumbnail) = &project.thumbnail_url {
        println!("Thumbnail:   {}", thumbnail);
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", tags.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_args_camera_overrides_preset() {
        let cli = Cli::parse_from([
            "mclip",
            "generate",
            "--image",
            "cat.png",
            "--prompt",
            "wave",
            "--preset",
            "drone-rise",
            "--intensity",
            "3",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let camera = args.camera().unwrap().unwrap();
        assert_eq!(camera.movement, CameraMovement::Crane);
        assert_eq!(camera.duration, ClipDuration::Eight);
        assert_eq!(camera.intensity, 3);
        assert_eq!(args.resolution, VideoResolution::P720);
    }

    #[test]
    fn test_generate_without_camera_options() {
        let cli = Cli::parse_from(["mclip", "generate", "-i", "cat.png", "-p", "wave"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert!(args.camera().unwrap().is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["mclip", "projects", "list", "--mine", "--json"]);
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Projects(ProjectsCommand::List { mine: true, tag: None })
        ));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
