// All LLM prompt templates for the Generation module.
// Placeholders are `{name}` and are filled with `str::replace` before sending.
// System instructions come from llm_client::prompts.

/// Professional summary. Replace `{name}`, `{skills}`, `{experience}`, `{target_role}`.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Write an ATS-optimized professional summary for this candidate.

Candidate profile:
- Name: {name}
- Skills: {skills}
- Experience: {experience}
- Target role: {target_role}

Rules:
1. 3-4 sentences.
2. Open with years of experience and primary expertise.
3. Mention 2-3 key achievements or specializations.
4. Close with a career objective aligned to the target role.
5. Work the role's likely ATS keywords in naturally.
6. Action-oriented language; no first-person pronouns (I, me, my).
7. Do not mention age, gender, birth year or health.

Return only the summary text."#;

/// Skills section. Replace `{skills}`, `{target_role}`.
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"Reorganize these skills into an ATS-friendly skills section.

Raw skills: {skills}
Target role: {target_role}

Rules:
1. Group skills into categories (Programming Languages, Frameworks, Tools, Soft Skills, ...).
2. One category per line, formatted as:
   • Category: Skill1, Skill2, Skill3
3. Order categories by relevance to the target role.
4. Add proficiency levels where they are evident (Advanced, Intermediate).
5. Add commonly expected skills the profile clearly implies but omits.
6. 15-25 skills in total.
7. Use standard spellings ("PostgreSQL", not "Postgres").

Return only the formatted list."#;

/// Experience section. Replace `{experience}`, `{target_role}`.
pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"Rewrite this work history as achievement-oriented resume bullets.

Raw experience: {experience}
Target role: {target_role}

Rules:
1. Turn responsibilities into achievements.
2. Start every bullet with a strong action verb (Architected, Delivered, Optimized, ...).
3. Quantify impact where the input supports it (percentages, team sizes, time saved).
4. 1-2 lines per bullet, 3-5 bullets per role.
5. Format each role as:
   Job Title | Company | Date Range
   • Bullet
   • Bullet
6. Use gender-neutral language and never state ages.

Return only the formatted experience."#;

/// Cover letter. Replace `{name}`, `{skills}`, `{experience}`, `{target_role}`,
/// `{company}`, `{job_description}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a cover letter for this candidate.

Candidate:
- Name: {name}
- Skills: {skills}
- Experience: {experience}
- Target role: {target_role}

Company: {company}
Job description:
{job_description}

Rules:
1. Three paragraphs, about 300 words.
2. Opening: enthusiasm for this role at this company.
3. Body: 2-3 achievements that map to the job description.
4. Closing: restate interest and ask for a conversation.
5. Professional but personable.

Return only the letter text."#;

/// ATS keyword extraction. Replace `{job_description}`.
pub const ATS_KEYWORDS_PROMPT_TEMPLATE: &str = r#"Extract the keywords an ATS would scan for in this job description.

Job description:
{job_description}

Rules:
1. 15-20 keywords or short phrases, most critical first.
2. Group them exactly as:
Hard Skills: skill1, skill2
Soft Skills: skill1, skill2
Tools: tool1, tool2
Certifications: cert1, cert2
3. Leave a group's list empty rather than inventing entries."#;

/// Recommendations. Replace `{summary}`, `{skills}`, `{experience}`,
/// `{job_description}`, `{match_score}`.
pub const RECOMMENDATIONS_PROMPT_TEMPLATE: &str = r#"Review this resume against the job description and suggest improvements.

Resume summary: {summary}
Resume skills: {skills}
Resume experience: {experience}
Job description: {job_description}
Current match score: {match_score}%

Rules:
1. 3-5 specific, actionable recommendations.
2. Focus on gaps between the resume and the job requirements.
3. Name concrete keywords or phrases to add.
4. Suggest structural changes only if needed.
5. 1-2 sentences each.

Return a numbered list (1., 2., ...) and nothing else."#;
