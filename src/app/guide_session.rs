use crate::ai::guide::ERROR_NOTICE;
use crate::ai::{AiGuide, GuideStream, ImageAttachment};
use crate::models::{ChatMessage, ChatRole};

pub const GREETING: &str = "Hello! I'm your AI Farming Guide. Ask me anything about farming in Uganda, or upload a photo of a plant for diagnosis.";

pub const QUICK_QUESTIONS: [&str; 3] = [
    "What should I plant this month?",
    "How to treat maize rust?",
    "Best practices for poultry farming?",
];

const EMPTY_REPLY_NOTICE: &str =
    "Sorry, something went wrong. Please check your connection and try again.";

/// Transcript of one AI Guide conversation. Not persisted.
#[derive(Debug, Clone)]
pub struct GuideSession {
    messages: Vec<ChatMessage>,
    loading: bool,
}

impl Default for GuideSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GuideSession {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::model(GREETING)],
            loading: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while waiting for the first fragment of a reply
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Quick questions are offered until the first exchange
    pub fn shows_quick_questions(&self) -> bool {
        self.messages.len() <= 1
    }

    /// Record the user's message and start the reply. Blank input with no
    /// image is ignored.
    pub fn submit(
        &mut self,
        guide: &AiGuide,
        prompt: &str,
        image: Option<ImageAttachment>,
    ) -> Option<GuideStream> {
        if prompt.trim().is_empty() && image.is_none() {
            return None;
        }
        let preview = image.as_ref().map(ImageAttachment::data_url);
        self.messages.push(ChatMessage::user(prompt, preview));
        self.loading = true;
        Some(guide.ask(prompt, image))
    }

    /// Append one fragment. The first replaces the loading indicator with a
    /// new model message; later ones extend it. The error notice always gets
    /// its own bubble.
    pub fn receive(&mut self, fragment: &str) {
        if self.loading {
            self.messages.push(ChatMessage::model(fragment));
            self.loading = false;
            return;
        }
        match self.messages.last_mut() {
            Some(last) if last.role == ChatRole::Model && fragment != ERROR_NOTICE => {
                last.append(fragment)
            }
            _ => self.messages.push(ChatMessage::model(fragment)),
        }
    }

    /// Close out a reply; a reply with no fragments becomes an apology
    pub fn finish(&mut self) {
        if self.loading {
            self.messages.push(ChatMessage::model(EMPTY_REPLY_NOTICE));
            self.loading = false;
        }
    }

    /// Submit and consume the whole reply. Returns the model's message.
    pub async fn send(
        &mut self,
        guide: &AiGuide,
        prompt: &str,
        image: Option<ImageAttachment>,
    ) -> Option<&ChatMessage> {
        let mut stream = self.submit(guide, prompt, image)?;
        while let Some(fragment) = stream.next_fragment().await {
            self.receive(&fragment);
        }
        self.finish();
        self.messages.last()
    }

    pub async fn ask_quick_question(
        &mut self,
        guide: &AiGuide,
        index: usize,
    ) -> Option<&ChatMessage> {
        let question: &'static str = QUICK_QUESTIONS.get(index).copied()?;
        self.send(guide, question, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::guide::UNAVAILABLE_NOTICE;
    use crate::ai::testing::{ScriptedBackend, Step};
    use crate::ai::ModelBackend;
    use std::sync::Arc;

    fn scripted_guide(steps: Vec<Step>) -> AiGuide {
        AiGuide::new(Some(
            Arc::new(ScriptedBackend::streaming(steps)) as Arc<dyn ModelBackend>
        ))
    }

    #[test]
    fn starts_with_greeting_and_quick_questions() {
        let session = GuideSession::new();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text(), GREETING);
        assert!(session.shows_quick_questions());
    }

    #[test]
    fn first_fragment_replaces_loading() {
        let mut session = GuideSession::new();
        session.messages.push(ChatMessage::user("hi", None));
        session.loading = true;

        session.receive("Hel");
        assert!(!session.is_loading());
        session.receive("lo");

        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[2].text(), "Hello");
    }

    #[tokio::test]
    async fn blank_prompt_is_ignored() {
        let mut session = GuideSession::new();
        let guide = AiGuide::new(None);
        assert!(session.submit(&guide, "  ", None).is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn streamed_reply_becomes_one_message() {
        let mut session = GuideSession::new();
        let guide = scripted_guide(vec![Step::Text("Spray "), Step::Text("fungicide.")]);

        let reply = session.send(&guide, "How to treat maize rust?", None).await.unwrap();
        assert_eq!(reply.text(), "Spray fungicide.");
        assert_eq!(reply.role, ChatRole::Model);
        assert_eq!(session.messages().len(), 3);
        assert!(!session.shows_quick_questions());
    }

    #[tokio::test]
    async fn unavailable_guide_replies_with_notice() {
        let mut session = GuideSession::new();
        let guide = AiGuide::new(None);
        let reply = session.ask_quick_question(&guide, 2).await.unwrap();
        assert_eq!(reply.text(), UNAVAILABLE_NOTICE);
        assert_eq!(session.messages()[1].text(), QUICK_QUESTIONS[2]);
    }

    #[tokio::test]
    async fn error_after_partial_reply_gets_own_bubble() {
        let mut session = GuideSession::new();
        let guide = scripted_guide(vec![Step::Text("Poultry need "), Step::Fail]);

        let reply = session.send(&guide, "Poultry tips?", None).await.unwrap();
        assert_eq!(reply.text(), ERROR_NOTICE);
        assert_eq!(reply.role, ChatRole::Model);

        let texts: Vec<_> = session.messages().iter().map(|m| m.text()).collect();
        assert_eq!(texts[2..], ["Poultry need ", ERROR_NOTICE]);
    }

    #[tokio::test]
    async fn error_before_any_text_is_single_bubble() {
        let mut session = GuideSession::new();
        let guide = scripted_guide(vec![Step::Fail]);

        session.send(&guide, "Poultry tips?", None).await;
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[2].text(), ERROR_NOTICE);
    }

    #[tokio::test]
    async fn empty_reply_becomes_apology() {
        let mut session = GuideSession::new();
        let guide = scripted_guide(vec![]);

        let reply = session.send(&guide, "Anything?", None).await.unwrap();
        assert_eq!(reply.text(), EMPTY_REPLY_NOTICE);
    }

    #[tokio::test]
    async fn image_preview_is_kept_on_user_message() {
        let mut session = GuideSession::new();
        let guide = scripted_guide(vec![Step::Text("Looks healthy.")]);
        let image = ImageAttachment::new("image/png", vec![0]);

        session.send(&guide, "", Some(image)).await;
        assert_eq!(
            session.messages()[1].image.as_deref(),
            Some("data:image/png;base64,AA==")
        );
    }
}
