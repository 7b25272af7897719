//! Prompt templates, one per flavor.
//!
//! Every template ends with the exact JSON skeleton its contract checks, so
//! the model sees the literal key names and nesting it has to produce.

use crate::contract::{
    ResponseContract, ACTIVITY, COACHING, LESSON_PLAN, LESSON_STEPS, PARENT_MESSAGE,
    VIDEO_SUGGESTIONS,
};
use crate::requests::{
    ActivityRequest, ClusterVideoRequest, CoachQuery, ParentMessageRequest, PlannerRequest,
    VideoSuggestionRequest, DEFAULT_LANGUAGE,
};

pub const SYSTEM_PROMPT: &str = "You are a helpful teacher coach for Indian classrooms.";

pub const COACHING_FORMAT: &str = stringify!({
    "now_fix": { "title": "short title", "text": "what to do in the next 2 minutes" },
    "activity": { "title": "short title", "text": "a simple activity for this class" },
    "explain": { "title": "short title", "text": "a plain explanation of the concept" }
});

pub const LESSON_STEPS_FORMAT: &str = stringify!({
    "steps": ["step 1", "step 2", "step 3"],
    "engagement_idea": "one way to keep students involved",
    "exit_check": "one quick question to check understanding"
});

pub const LESSON_PLAN_FORMAT: &str = stringify!({
    "topic": "string",
    "competencies": ["string"],
    "methods": [
        { "title": "string", "description": "string", "time": "string" }
    ],
    "teacher_tip": "string"
});

pub const ACTIVITY_FORMAT: &str = stringify!({
    "steps": ["step 1", "step 2", "step 3"],
    "grouping": "how to group the students",
    "quick_assessment": "how to check learning in one minute"
});

pub const PARENT_MESSAGE_FORMAT: &str = stringify!({
    "message": "the message text"
});

pub const VIDEO_FORMAT: &str = stringify!({
    "videos": [
        {
            "title": "string",
            "channel": "string",
            "duration": "m:ss",
            "url": "https://www.youtube.com/watch?v=..."
        }
    ]
});

const JSON_ONLY: &str = "Respond with valid JSON only. No markdown, no code fences, no text before or after the JSON.";

/// The fixed set of prompt/contract pairings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    Coaching,
    LessonSteps,
    LessonPlan,
    Activity,
    ParentMessage,
    VideoSuggestions,
}

impl Flavor {
    pub fn contract(self) -> &'static ResponseContract {
        match self {
            Flavor::Coaching => &COACHING,
            Flavor::LessonSteps => &LESSON_STEPS,
            Flavor::LessonPlan => &LESSON_PLAN,
            Flavor::Activity => &ACTIVITY,
            Flavor::ParentMessage => &PARENT_MESSAGE,
            Flavor::VideoSuggestions => &VIDEO_SUGGESTIONS,
        }
    }

    pub fn name(self) -> &'static str {
        self.contract().name
    }
}

/// A flavor together with the validated parameters it renders.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptSpec {
    Coaching(CoachQuery),
    LessonSteps(PlannerRequest),
    LessonPlan(PlannerRequest),
    Activity(ActivityRequest),
    ParentMessage(ParentMessageRequest),
    Videos(VideoSuggestionRequest),
    ClusterVideos(ClusterVideoRequest),
}

impl PromptSpec {
    pub fn flavor(&self) -> Flavor {
        match self {
            PromptSpec::Coaching(_) => Flavor::Coaching,
            PromptSpec::LessonSteps(_) => Flavor::LessonSteps,
            PromptSpec::LessonPlan(_) => Flavor::LessonPlan,
            PromptSpec::Activity(_) => Flavor::Activity,
            PromptSpec::ParentMessage(_) => Flavor::ParentMessage,
            PromptSpec::Videos(_) | PromptSpec::ClusterVideos(_) => Flavor::VideoSuggestions,
        }
    }

    pub fn contract(&self) -> &'static ResponseContract {
        self.flavor().contract()
    }

    pub fn render(&self) -> String {
        match self {
            PromptSpec::Coaching(q) => coaching_prompt(q),
            PromptSpec::LessonSteps(r) => lesson_steps_prompt(r),
            PromptSpec::LessonPlan(r) => lesson_plan_prompt(r),
            PromptSpec::Activity(r) => activity_prompt(r),
            PromptSpec::ParentMessage(r) => parent_message_prompt(r),
            PromptSpec::Videos(r) => video_prompt(r),
            PromptSpec::ClusterVideos(r) => cluster_video_prompt(r),
        }
    }
}

pub fn coaching_prompt(q: &CoachQuery) -> String {
    format!(
        "You are an experienced, respectful classroom coach for Indian school teachers.

Context:
- Class level: {class_level}
- Subject: {subject}
- Teacher's problem: \"{problem}\"
- Reply language: {language}

Rules:
1. Never scold or judge the teacher.
2. No long theory. Each card text is at most 3 short sentences.
3. Use simple words in the reply language.
4. Give practical advice that works in a crowded classroom with few materials.
5. Answer with exactly three cards: now_fix, activity, explain.

{JSON_ONLY}
JSON format:
{COACHING_FORMAT}
",
        class_level = q.class_level,
        subject = q.subject,
        problem = q.problem_text,
        language = q.language(),
    )
}

pub fn lesson_steps_prompt(r: &PlannerRequest) -> String {
    format!(
        "You are helping a teacher in an Indian government school plan one lesson.

Context:
- Grade: {grade}
- Subject: {subject}
- Time available: {minutes} minutes

Rules:
1. Give 3 to 5 short steps that fit inside the time available.
2. Steps must work for a large class with limited resources.
3. Keep the wording simple and classroom-friendly.

{JSON_ONLY}
JSON format:
{LESSON_STEPS_FORMAT}
",
        grade = r.grade,
        subject = r.subject,
        minutes = r.time_available,
    )
}

pub fn lesson_plan_prompt(r: &PlannerRequest) -> String {
    format!(
        "You are an AI assistant helping teachers in Indian government schools.
Generate a lesson plan.

Guidelines:
1. Use simple, actionable, classroom-friendly wording.
2. List grade-level competencies relevant to the topic.
3. Include 2 or 3 interactive teaching methods.
4. Give each method a realistic time; the times add up to the total time available.
5. Assume large classes, limited resources and mixed backgrounds.
6. Keep the content respectful and dignity-preserving.

Context:
- Grade: {grade}
- Subject: {subject}
- Total time available: {minutes} minutes

{JSON_ONLY}
JSON format:
{LESSON_PLAN_FORMAT}
",
        grade = r.grade,
        subject = r.subject,
        minutes = r.time_available,
    )
}

pub fn activity_prompt(r: &ActivityRequest) -> String {
    let materials = if r.materials_available.is_empty() {
        "none".to_string()
    } else {
        r.materials_available.join(", ")
    };
    format!(
        "Create one classroom activity.

Context:
- Students: {size}
- Learning levels: {levels}
- Time left: {minutes} minutes
- Materials: {materials}

Rules:
- Simple, no preparation needed.
- Inclusive of every learning level listed.
- At most 3 steps.

{JSON_ONLY}
JSON format:
{ACTIVITY_FORMAT}
",
        size = r.class_size,
        levels = r.learning_levels.join(", "),
        minutes = r.time_left,
    )
}

pub fn parent_message_prompt(r: &ParentMessageRequest) -> String {
    let language = r
        .language
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE);
    format!(
        "Write a short, respectful message from a teacher to a parent.

Context:
- Student: {student}
- Currently learning: {topic}
- Language: {language}

Rules:
- At most 4 sentences.
- Warm and encouraging, never blaming.
- Suggest one small thing the parent can do at home.

{JSON_ONLY}
JSON format:
{PARENT_MESSAGE_FORMAT}
",
        student = r.student_name,
        topic = r.topic,
    )
}

pub fn video_prompt(r: &VideoSuggestionRequest) -> String {
    format!(
        "Suggest 3 short YouTube videos a teacher can show in class.

Context:
- Grade: {grade}
- Subject: {subject}
- Topic: {topic}
- Lesson length: {minutes} minutes

Rules:
- Each video is shorter than a quarter of the lesson.
- Prefer well-known educational channels.
- Only suggest videos you are confident exist.

{JSON_ONLY}
JSON format:
{VIDEO_FORMAT}
",
        grade = r.grade,
        subject = r.subject,
        topic = r.topic,
        minutes = r.time_available,
    )
}

pub fn cluster_video_prompt(r: &ClusterVideoRequest) -> String {
    format!(
        "Suggest 3 short YouTube videos for teachers about a teaching practice.

Practice: {name}
About: {description}

Rules:
- Videos explain or demonstrate the practice for teachers.
- Prefer well-known educational channels.
- Only suggest videos you are confident exist.

{JSON_ONLY}
JSON format:
{VIDEO_FORMAT}
",
        name = r.cluster_name,
        description = r.description,
    )
}
