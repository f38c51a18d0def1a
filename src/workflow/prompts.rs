pub const COMMIT_SUMMARY_PROMPT: &str = "Please provide a concise, clear summary of the following commit in changelog format.
Important guidelines:
- Distinguish between actual bug fixes (issues in existing functionality) and QA-related fixes (issues found during testing of new features)
- QA tickets (usually containing 'QA-' or similar in commit messages) should be categorized as 'Improvements' or 'Features' since they're enhancing new functionality
- Only categorize as 'Bug Fixes' if it's fixing existing, previously working functionality
- Focus on the impact and purpose of the changes from an end-user perspective
- Include relevant technical details only if they're important for understanding the change";

pub const CHANGELOG_PROMPT: &str = "Please create a comprehensive QA-focused changelog from the following commit summaries.

Organization guidelines:

1. High-Level Summary:
   - Brief overview of the release's major changes
   - Key areas requiring focused testing
   - Potential risk areas

2. Detailed Changes (categorized):
   🚀 New Features
   - List each new feature
   - Specify what functionality needs to be tested
   - Note any dependencies or related features that could be impacted

   ✨ Improvements & Enhancements
   - Detail improvements to existing features
   - Highlight changes in user workflows or UI
   - Note any performance improvements that need verification

   🐛 Bug Fixes
   - Describe each fix and its impact
   - Specify regression testing needs
   - Note related features that should be re-tested

   🔧 Technical Changes
   - List infrastructure or system-level changes
   - Note any performance or security implications
   - Highlight areas needing load/stress testing

3. Testing Focus Areas:
   - Critical user paths affected
   - Cross-browser/device testing requirements
   - API endpoints or services modified
   - Database changes or data migrations
   - Performance-sensitive areas
   - Security considerations

4. Integration Points:
   - List affected third-party integrations
   - Note any API changes or versioning
   - Highlight cross-service dependencies

Make it detailed and structured, focusing on what QA needs to verify and test thoroughly.";

pub const CHANGES_PROMPT: &str = "Please summarize the following code changes:";
