// Run one coaching flavor from the terminal, for checking prompt templates
// against the live model.
use classroom_coach::{
    init_tracing,
    pipeline,
    requests::{
        ActivityRequest, ClusterVideoRequest, CoachQuery, ParentMessageRequest, PlannerRequest,
        Validate, VideoSuggestionRequest,
    },
    videos, GroqClient, PromptSpec, Settings,
};
use clap::{Arg, ArgAction, Command};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let matches = Command::new("coach-cli")
        .about("Ask the classroom coach from the terminal")
        .arg(Arg::new("render-only")
                .long("render-only")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print the rendered prompt instead of calling the model"))
        .subcommand(Command::new("coach")
                        .aliases(["c", "query"])
                        .about("Coaching advice for a classroom problem"))
        .subcommand(Command::new("steps")
                        .aliases(["s", "planner"])
                        .about("Lesson steps with an engagement idea and exit check"))
        .subcommand(Command::new("plan")
                        .aliases(["p", "generate-plan"])
                        .about("Lesson plan with competencies and timed methods"))
        .subcommand(Command::new("activity")
                        .aliases(["a"])
                        .about("Quick classroom activity"))
        .subcommand(Command::new("parent")
                        .aliases(["m", "message"])
                        .about("Message for a student's parent"))
        .subcommand(Command::new("videos")
                        .aliases(["v"])
                        .about("Video suggestions for a topic"))
        .subcommand(Command::new("cluster")
                        .about("Video suggestions for a teaching practice"))
        .get_matches();

    let spec = match matches.subcommand() {
        Some(("coach", _)) => PromptSpec::Coaching(read_coach_query()?),
        Some(("steps", _)) => PromptSpec::LessonSteps(read_planner_request()?),
        Some(("plan", _)) => PromptSpec::LessonPlan(read_planner_request()?),
        Some(("activity", _)) => PromptSpec::Activity(read_activity_request()?),
        Some(("parent", _)) => PromptSpec::ParentMessage(read_parent_request()?),
        Some(("videos", _)) => PromptSpec::Videos(read_video_request()?),
        Some(("cluster", _)) => PromptSpec::ClusterVideos(read_cluster_request()?),
        _ => {
            eprintln!("Invalid command, use coach-cli help");
            return Ok(());
        }
    };

    if matches.get_flag("render-only") {
        println!("{}", spec.render());
        return Ok(());
    }

    let settings = Settings::from_env()?;
    let client = GroqClient::new(settings.completion)?;

    let output = match spec {
        PromptSpec::Videos(_) | PromptSpec::ClusterVideos(_) => {
            serde_json::to_string_pretty(&videos::suggest(&client, &spec).await)?
        }
        _ => match pipeline::run(&client, &spec).await {
            Ok(map) => serde_json::to_string_pretty(&map)?,
            Err(e) => {
                eprintln!("[{}] {} (stage: {})", e.code(), e, e.stage());
                std::process::exit(1);
            }
        },
    };
    println!("{}", output);

    Ok(())
}

fn read_coach_query() -> Result<CoachQuery, Box<dyn std::error::Error>> {
    let query = CoachQuery {
        class_level: ask_number("Class level")?,
        subject: ask("Subject")?,
        problem_text: ask("Describe the problem")?,
        language: Some(ask("Language [Hindi/Hinglish]")?).filter(|l| !l.is_empty()),
    };
    query.validate()?;
    Ok(query)
}

fn read_planner_request() -> Result<PlannerRequest, Box<dyn std::error::Error>> {
    let request = PlannerRequest {
        grade: ask_number("Grade")?,
        subject: ask("Subject")?,
        time_available: ask_number("Minutes available")?,
    };
    request.validate()?;
    Ok(request)
}

fn read_activity_request() -> Result<ActivityRequest, Box<dyn std::error::Error>> {
    let request = ActivityRequest {
        class_size: ask_number("Number of students")?,
        learning_levels: ask_list("Learning levels (comma separated)")?,
        time_left: ask_number("Minutes left")?,
        materials_available: ask_list("Materials (comma separated)")?,
    };
    request.validate()?;
    Ok(request)
}

fn read_parent_request() -> Result<ParentMessageRequest, Box<dyn std::error::Error>> {
    let request = ParentMessageRequest {
        student_name: ask("Student name")?,
        topic: ask("Topic")?,
        language: Some(ask("Language [Hindi/Hinglish]")?).filter(|l| !l.is_empty()),
    };
    request.validate()?;
    Ok(request)
}

fn read_video_request() -> Result<VideoSuggestionRequest, Box<dyn std::error::Error>> {
    let request = VideoSuggestionRequest {
        grade: ask_number("Grade")?,
        subject: ask("Subject")?,
        topic: ask("Topic")?,
        time_available: ask_number("Minutes available")?,
    };
    request.validate()?;
    Ok(request)
}

fn read_cluster_request() -> Result<ClusterVideoRequest, Box<dyn std::error::Error>> {
    let request = ClusterVideoRequest {
        cluster_name: ask("Practice name")?,
        description: ask("Description")?,
    };
    request.validate()?;
    Ok(request)
}

fn ask(question: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut output = String::new();
    get_response(question, &mut output)?;
    Ok(output.trim().to_string())
}

fn ask_number(question: &str) -> Result<u32, Box<dyn std::error::Error>> {
    Ok(ask(question)?.parse::<u32>()?)
}

fn ask_list(question: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    Ok(ask(question)?
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

fn get_response(question: &str, output: &mut String)
-> Result<(), Box<dyn std::error::Error>> {
    print!("{}: ", question);
    io::stdout().flush()?;

    io::stdin().read_line(output)?;

    Ok(())
}
