//! Closed value sets carried on the wire as i32
//!
//! Values outside a set make the enclosing record undecodable
//! (`CodecError::UnknownEnum`).

use serde::{Deserialize, Serialize};

thrift_enum! {
    /// Kind of event being reported
    #[derive(Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum EventType: "EventType" {
        /// A page view
        #[default]
        View = 0,
        AdLoad = 1,
        Performance = 2,
        Network = 3,
        Interaction = 4,
        AbTest = 5,
        ComponentEvent = 6,
        Acquisition = 7,
    }
}

thrift_enum! {
    /// Editionalised front the app is showing
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Edition: "Edition" {
        Uk = 0,
        Us = 1,
        Au = 2,
        International = 3,
    }
}

thrift_enum! {
    /// How the user arrived at the viewed page
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Source: "Source" {
        FrontOrSection = 0,
        FixturesPage = 1,
        Swipe = 2,
        InArticleLink = 3,
        ExternalLink = 4,
        RelatedArticleLink = 5,
        Push = 6,
        HandoffWeb = 7,
        HandoffApp = 8,
        Widget = 9,
        ResumeMedia = 10,
        Back = 11,
        Search = 12,
        Spotlight = 13,
        StateRestoration = 14,
        PushBreakingNews = 15,
        PushFollowTag = 16,
        PushOther = 17,
        Discover = 18,
        Membership = 19,
        HomeScreen = 20,
        Navigation = 21,
    }
}

thrift_enum! {
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SubscriptionType: "SubscriptionType" {
        Free = 1,
        Store = 2,
        FreeWithExpiredStore = 3,
        Print = 4,
        FreeWithExpiredPrint = 5,
        DigitalPack = 6,
    }
}

thrift_enum! {
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum MembershipTier: "MembershipTier" {
        Friend = 1,
        Staff = 2,
        Supporter = 3,
        Partner = 4,
        Patron = 5,
    }
}
